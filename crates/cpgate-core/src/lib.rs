// cpgate-core: Session model, proxy service, and console state machine
// sitting between cpgate-api and the binary.

pub mod config;
pub mod console;
pub mod convert;
pub mod error;
pub mod model;
pub mod proxy;
pub mod session;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{DEFAULT_MANAGEMENT_URL, ProxyConfig, TlsVerification};
pub use console::{
    AuthState, Console, ConsoleBackend, ConsoleError, Control, Notification, NotificationLevel,
    RefreshOutcome, RemoteError,
};
pub use error::{AuthError, Operation, ProxyError};
pub use model::{CLONE_SUFFIX, EditableField, Gateway, NetworkInterface};
pub use proxy::{CreateOutcome, CreateReply, LoginReply, LoginRequest, ProxyService, PublishStatus};
pub use session::{DOMAIN_COOKIE, SID_COOKIE, Session};

pub use cpgate_api::SessionId;
