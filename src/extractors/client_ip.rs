//! Client address for rate limiting.

use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, FromRequestParts},
    http::request::Parts,
};
use std::net::SocketAddr;

pub const FORWARDED_FOR_HEADER: &str = "X-Forwarded-For";

/// First `X-Forwarded-For` entry, else the socket peer, else `"unknown"`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClientIp(pub String);

impl ClientIp {
    pub fn from_parts(parts: &Parts) -> Self {
        let forwarded = parts
            .headers
            .get(FORWARDED_FOR_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        if let Some(ip) = forwarded {
            return ClientIp(ip);
        }
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string());
        ClientIp(peer.unwrap_or_else(|| "unknown".to_string()))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for ClientIp
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(ClientIp::from_parts(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts(req: Request<()>) -> Parts {
        req.into_parts().0
    }

    #[test]
    fn forwarded_header_wins() {
        let p = parts(
            Request::builder()
                .header(FORWARDED_FOR_HEADER, " 10.0.0.7 , 172.16.0.1")
                .body(())
                .unwrap(),
        );
        assert_eq!(ClientIp::from_parts(&p), ClientIp("10.0.0.7".into()));
    }

    #[test]
    fn falls_back_to_peer_then_unknown() {
        let mut req = Request::builder().body(()).unwrap();
        let addr: SocketAddr = "192.168.1.20:5555".parse().unwrap();
        req.extensions_mut().insert(ConnectInfo(addr));
        assert_eq!(ClientIp::from_parts(&parts(req)).0, "192.168.1.20");

        let bare = parts(Request::builder().body(()).unwrap());
        assert_eq!(ClientIp::from_parts(&bare).0, "unknown");
    }
}
