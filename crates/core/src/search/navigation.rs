//! Navigation targets and the navigator seam.

use tokio::sync::mpsc;

/// A storefront location: a path plus ordered query parameters.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Destination {
    pub path: String,
    pub params: Vec<(String, String)>,
}

impl Destination {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            params: Vec::new(),
        }
    }

    /// Append a query parameter.
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((name.into(), value.into()));
        self
    }

    /// First value of a query parameter.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a parameter in place, dropping any duplicates of it.
    pub fn set_param(&mut self, name: &str, value: &str) {
        match self.params.iter().position(|(n, _)| n == name) {
            Some(idx) => {
                self.params[idx].1 = value.to_string();
                let mut seen = 0;
                self.params.retain(|(n, _)| {
                    if n != name {
                        return true;
                    }
                    seen += 1;
                    seen == 1
                });
            }
            None => self.params.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_param(&mut self, name: &str) {
        self.params.retain(|(n, _)| n != name);
    }

    /// Render as `path?name=value&...` with percent-encoded names and values.
    pub fn to_url(&self) -> String {
        if self.params.is_empty() {
            return self.path.clone();
        }

        let query: Vec<String> = self
            .params
            .iter()
            .map(|(n, v)| format!("{}={}", urlencoding::encode(n), urlencoding::encode(v)))
            .collect();

        format!("{}?{}", self.path, query.join("&"))
    }

    /// Parse a relative URL such as `/store?q=red+shirt&page=2`.
    ///
    /// `+` decodes to a space, as browsers do for form-encoded query strings.
    /// Malformed escapes are kept verbatim.
    pub fn parse(url: &str) -> Self {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        let params = query
            .split('&')
            .filter(|pair| !pair.is_empty())
            .map(|pair| {
                let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(name), decode_component(value))
            })
            .collect();

        Self {
            path: path.to_string(),
            params,
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}

/// Performs full navigation to a storefront location.
///
/// Implemented by the UI shell hosting the search surface.
pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &Destination);
}

/// Navigator that forwards destinations to the UI shell's event loop.
///
/// This is cheaply cloneable. If the channel is full or closed, the error is
/// logged and the navigation is dropped.
#[derive(Clone)]
pub struct ChannelNavigator {
    tx: mpsc::Sender<Destination>,
}

impl ChannelNavigator {
    pub fn new(tx: mpsc::Sender<Destination>) -> Self {
        Self { tx }
    }

    /// Create a navigator together with the receiving end of its channel.
    pub fn channel(buffer_size: usize) -> (Self, mpsc::Receiver<Destination>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Self::new(tx), rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, destination: &Destination) {
        if let Err(e) = self.tx.try_send(destination.clone()) {
            tracing::error!("Failed to forward navigation to {}: {}", destination.to_url(), e);
        }
    }
}
