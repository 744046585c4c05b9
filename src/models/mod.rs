pub mod email;

pub use email::{
    is_valid_email,
    EmailLog,
    EmailStatus,
    EmailStatusEntry,
    SendEmailRequest,
    SendEmailResponse,
    StatusQuery,
    StatusResponse,
};
