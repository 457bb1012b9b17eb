//! Access to the remote quote server.
//!
//! The server is a public mock collection of "posts". Reading maps each post's `id` and
//! `title` onto a [`Quote`] with a placeholder category; writing posts one quote as a
//! JSON body and ignores the answer apart from logging it. Requests are made once:
//! there is no retry or backoff.
use log::{debug, info};
use quote_common::net::posts_url;
use quote_common::{Quote, QuoteError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;

use crate::SyncConfig;

/// Source of remote quotes and sink for locally added ones.
pub trait RemoteSource: Send {
    /// Fetch the current remote sequence, already mapped to the `Quote` shape.
    fn fetch_quotes(&self) -> Result<Vec<Quote>>;

    /// Send a newly added quote to the server.
    fn publish(&self, quote: &Quote) -> Result<()>;
}

impl<R: RemoteSource + ?Sized> RemoteSource for Box<R> {
    fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        (**self).fetch_quotes()
    }

    fn publish(&self, quote: &Quote) -> Result<()> {
        (**self).publish(quote)
    }
}

/// Item of the remote collection. Only the fields that become a quote are read.
#[derive(Debug, Deserialize)]
struct RemotePost {
    id: u64,
    title: String,
}

/// Blocking HTTP implementation of [`RemoteSource`].
pub struct HttpRemote {
    client: Client,
    posts_url: String,
    fetch_limit: usize,
    category: String,
}

impl HttpRemote {
    /// Creates a remote for the server described by `config`.
    pub fn new(config: &SyncConfig) -> Self {
        Self {
            client: Client::new(),
            posts_url: posts_url(&config.server_url),
            fetch_limit: config.fetch_limit,
            category: config.server_category.clone(),
        }
    }

    /// URL of the bounded read of the posts collection.
    pub fn fetch_url(&self) -> String {
        format!("{}?_limit={}", self.posts_url, self.fetch_limit)
    }

    fn to_quote(&self, post: RemotePost) -> Quote {
        Quote {
            id: post.id,
            text: post.title,
            category: self.category.clone(),
        }
    }
}

impl RemoteSource for HttpRemote {
    fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        let url = self.fetch_url();
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(QuoteError::Server {
                status: response.status().as_u16(),
            });
        }

        let posts: Vec<RemotePost> = response.json()?;
        Ok(posts.into_iter().map(|post| self.to_quote(post)).collect())
    }

    fn publish(&self, quote: &Quote) -> Result<()> {
        debug!("POST {} id={}", self.posts_url, quote.id);
        let response = self.client.post(&self.posts_url).json(quote).send()?;

        if !response.status().is_success() {
            return Err(QuoteError::Server {
                status: response.status().as_u16(),
            });
        }
        info!("Posted quote {} to server", quote.id);
        Ok(())
    }
}

/// Remote used when running without network access: nothing to fetch, nowhere to post.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineRemote;

impl RemoteSource for OfflineRemote {
    fn fetch_quotes(&self) -> Result<Vec<Quote>> {
        debug!("Offline: skipping fetch");
        Ok(Vec::new())
    }

    fn publish(&self, quote: &Quote) -> Result<()> {
        debug!("Offline: not posting quote {}", quote.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one canned HTTP response on a local port and return the base URL.
    fn serve_once(response: String) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    fn remote_for(server_url: &str) -> HttpRemote {
        HttpRemote::new(&SyncConfig {
            server_url: server_url.to_string(),
            ..SyncConfig::default()
        })
    }

    #[test]
    fn fetch_url_limits_the_collection() {
        let remote = remote_for("http://localhost:3000/");
        assert_eq!(remote.fetch_url(), "http://localhost:3000/posts?_limit=5");
    }

    #[test]
    fn fetch_maps_a_served_collection() {
        let body = r#"[{"userId":1,"id":7,"title":"served","body":"x"}]"#;
        let response = format!(
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        );
        let remote = remote_for(&serve_once(response));

        let quotes = remote.fetch_quotes().unwrap();

        assert_eq!(quotes, vec![Quote::new(7, "served", "Server")]);
    }

    #[test]
    fn fetch_maps_error_status_to_server_error() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        );
        let remote = remote_for(&url);

        let err = remote.fetch_quotes().unwrap_err();

        assert!(matches!(err, QuoteError::Server { status: 503 }));
    }

    #[test]
    fn fetch_from_unreachable_server_is_an_http_error() {
        let remote = remote_for("http://127.0.0.1:1");
        assert!(matches!(remote.fetch_quotes(), Err(QuoteError::Http(_))));
    }

    #[test]
    fn posts_map_to_server_quotes() {
        let remote = HttpRemote::new(&SyncConfig::default());
        let posts: Vec<RemotePost> = serde_json::from_str(
            r#"[{"userId": 1, "id": 1, "title": "sunt aut facere", "body": "quia et suscipit"}]"#,
        )
        .unwrap();

        let quotes: Vec<Quote> = posts.into_iter().map(|p| remote.to_quote(p)).collect();

        assert_eq!(quotes, vec![Quote::new(1, "sunt aut facere", "Server")]);
    }

    #[test]
    fn offline_remote_yields_nothing() {
        let remote: Box<dyn RemoteSource> = Box::new(OfflineRemote);
        assert!(remote.fetch_quotes().unwrap().is_empty());
        remote.publish(&Quote::new(1, "A", "X")).unwrap();
    }
}
