pub mod credentials;
pub mod support_ticket;

pub use credentials::SessionCredentials;
pub use support_ticket::{
    CustomFieldIds, RemoteComment, RemoteCustomField, RemoteTicket, RequestPool, SupportTicket,
    SupportTicketPool, TicketComment, TicketEnvelope,
};
