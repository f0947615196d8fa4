//! # kicklock-network
//!
//! 백엔드 REST 어댑터.
//! `/api/*` 경계에 대한 `RemoteClient` 포트 구현을 제공한다.
//!
//! ## 사용 예시
//!
//! ```rust,ignore
//! use kicklock_network::http_client::HttpRemoteClient;
//!
//! let client = HttpRemoteClient::new("http://localhost:3000", Duration::from_secs(30))?;
//! let status = client.status().await?;
//! ```

pub mod http_client;
