pub mod auth;
pub mod upstream;

pub use auth::AuthorizeUrlDto;
pub use upstream::UpstreamReply;
