pub mod identity;
pub mod users;

pub use identity::{bearer_or_cookie_token, Identity, IdentityContext, IdentityError, MaybeIdentity, TOKEN_COOKIE};
pub use users::{PgUserStore, UserStore, UserStoreError};
