pub mod badge;
pub mod session;
pub mod user;

pub use badge::UserBadge;
pub use session::{PomodoroSession, SessionStatus, MAX_SESSION_MINUTES};
pub use user::{User, DEFAULT_USER_ID};
