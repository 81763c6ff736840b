//! Browser-side session handling: transparent refresh of expired access
//! credentials and the multi-role selection step after login.

mod role_selection;
mod session;
mod transport;

pub use role_selection::{Navigation, PendingSelection, RoleSelectionFlow};
pub use session::SessionClient;
pub use transport::{ApiRequest, ApiResponse, ReqwestTransport, Transport};
