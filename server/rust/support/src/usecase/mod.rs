pub mod check_latest_version;
pub mod check_support;
pub mod comment_ticket;
pub mod create_ticket;
pub mod credentials;
pub mod get_ticket;
pub mod helpdesk_gate;
pub mod list_tickets;
pub mod upload_attachment;

pub use check_latest_version::{CheckLatestVersionUseCase, LatestVersion, LatestVersionBody};
pub use check_support::{CheckSupportUseCase, SupportCheck, SupportCheckSettings};
pub use comment_ticket::{CommentTicketInput, CommentTicketUseCase};
pub use create_ticket::{CreateTicketInput, CreateTicketUseCase};
pub use credentials::{ClearCredentialsUseCase, StoreCredentialsUseCase};
pub use get_ticket::GetTicketUseCase;
pub use helpdesk_gate::{HelpdeskGate, HelpdeskIntegration, HelpdeskSession};
pub use list_tickets::{ListTicketsUseCase, OPEN_PENDING_FILTER};
pub use upload_attachment::UploadAttachmentUseCase;
