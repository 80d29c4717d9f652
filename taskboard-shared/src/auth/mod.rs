/// Authentication utilities
///
/// This module provides the two authentication primitives the API needs:
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: Bearer-token issuing and verification (HS256)
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **Constant-time Comparison**: Password verification never short-circuits
/// - **JWT Tokens**: HS256 signing; signature and issuer are always checked
///
/// # Example
///
/// ```no_run
/// use taskboard_shared::auth::password::{hash_password, verify_password};
/// use taskboard_shared::auth::jwt::{create_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
