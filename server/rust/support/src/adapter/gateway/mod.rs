pub mod remote_check_http;
pub mod zendesk_client;

pub use remote_check_http::{HttpEntitlementGateway, HttpReleaseTagGateway};
pub use zendesk_client::{ZendeskClient, ZendeskConnector};
