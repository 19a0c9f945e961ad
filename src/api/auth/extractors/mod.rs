mod session;

pub use session::CurrentSession;
