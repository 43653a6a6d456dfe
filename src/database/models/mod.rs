pub mod additional_user;
pub mod organization;
pub mod platform_user;
pub mod protocol;
pub mod protocol_content;
pub mod protocol_pdf_file;
pub mod protocol_template;
pub mod role;
pub mod template_organization;
pub mod user_role;
pub mod user_session;

pub use additional_user::AdditionalUser;
pub use organization::Organization;
pub use platform_user::PlatformUser;
pub use protocol::Protocol;
pub use protocol_content::ProtocolContent;
pub use protocol_pdf_file::ProtocolPdfFile;
pub use protocol_template::ProtocolTemplate;
pub use role::Role;
pub use template_organization::TemplateOrganization;
pub use user_role::UserRole;
pub use user_session::UserSession;
