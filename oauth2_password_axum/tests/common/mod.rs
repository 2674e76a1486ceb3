pub mod mock_browser;
pub mod mock_provider;
pub mod test_server;

pub use mock_browser::MockBrowser;
pub use test_server::{FRONTEND_LOGIN, TestServer};
