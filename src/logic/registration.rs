use crate::logic::error::{CatalogError, CatalogResult};
use crate::model::{NewUser, RegisterRequest, User};
use crate::store::traits::{UniqueViolation, UserStore};

const USERNAME_TAKEN: &str = "Username already taken.";

/// Register a new user identity with a hashed password
pub async fn register_user<S: UserStore + ?Sized>(
    store: &S,
    request: RegisterRequest,
) -> CatalogResult<User> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(CatalogError::Validation(
            "Please provide both username and password.".to_string(),
        ));
    };

    if store.find_user_by_username(&username).await?.is_some() {
        return Err(CatalogError::Conflict(USERNAME_TAKEN.to_string()));
    }

    let user = store
        .create_user(NewUser::new(username, &password))
        .await
        .map_err(|err| {
            if err.is::<UniqueViolation>() {
                CatalogError::Conflict(USERNAME_TAKEN.to_string())
            } else {
                CatalogError::Internal(err)
            }
        })?;
    log::info!("Registered user {} ({})", user.id, user.username);
    Ok(user)
}
