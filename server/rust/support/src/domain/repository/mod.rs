pub mod credential_store;
pub mod helpdesk;
pub mod remote_check;

pub use credential_store::CredentialStore;
pub use helpdesk::{
    AttachmentFile, CommentDraft, HelpdeskClient, HelpdeskConnector, HelpdeskError,
    HelpdeskUser, NewTicket, TicketUpdate,
};
pub use remote_check::{
    EntitlementGateway, ReleaseTag, ReleaseTagGateway, RemoteCheckError, TagFetch,
};
