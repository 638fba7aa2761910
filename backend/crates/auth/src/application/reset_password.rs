//! Reset Password Use Case
//!
//! Rotates the password of an account and e-mails the new one. The new hash
//! is persisted before the e-mail is sent: a mail failure surfaces to the
//! caller but the rotation stays in place.

use std::sync::Arc;

use kernel::error::app_error::{AppResult, OptionExt};

use crate::domain::repository::UserRepository;
use crate::domain::service::{PasswordGenerator, PasswordHasher, PasswordResetMailer};
use crate::domain::value_object::email::Email;

/// Reset password use case
pub struct ResetPasswordUseCase<U, H, G, M>
where
    U: UserRepository,
    H: PasswordHasher,
    G: PasswordGenerator,
    M: PasswordResetMailer,
{
    user_repo: Arc<U>,
    hasher: Arc<H>,
    generator: Arc<G>,
    mailer: Arc<M>,
}

impl<U, H, G, M> ResetPasswordUseCase<U, H, G, M>
where
    U: UserRepository,
    H: PasswordHasher,
    G: PasswordGenerator,
    M: PasswordResetMailer,
{
    pub fn new(user_repo: Arc<U>, hasher: Arc<H>, generator: Arc<G>, mailer: Arc<M>) -> Self {
        Self {
            user_repo,
            hasher,
            generator,
            mailer,
        }
    }

    pub async fn execute(&self, email: String) -> AppResult<()> {
        let email = Email::new(email)?;

        let mut user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or_not_found("User", "no user with this email")?;

        let new_password = self.generator.generate();
        let password_hash = self.hasher.hash(&new_password).await?;

        user.change_password(password_hash);
        self.user_repo.update(&user).await?;

        tracing::info!(user_id = %user.id, "Password rotated");

        self.mailer
            .send_password_reset(&user.email, user.first_name.as_str(), &new_password)
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::user::User;
    use crate::domain::value_object::person_name::PersonName;
    use crate::domain::value_object::user_password::RawPassword;
    use crate::infra::memory::{InMemoryUserRepository, RecordingMailer};
    use crate::infra::password::{BcryptPasswordHasher, RandomPasswordGenerator};
    use kernel::error::kind::ErrorKind;

    struct Fixture {
        users: Arc<InMemoryUserRepository>,
        hasher: Arc<BcryptPasswordHasher>,
        mailer: Arc<RecordingMailer>,
    }

    async fn fixture(mailer: RecordingMailer) -> Fixture {
        let hasher = BcryptPasswordHasher::new(4);
        let users = InMemoryUserRepository::new();
        let hash = PasswordHasher::hash(&hasher, &RawPassword::new("secret1".into()).unwrap())
            .await
            .unwrap();
        users.insert(User::register(
            PersonName::first("Ada").unwrap(),
            PersonName::last("Lovelace").unwrap(),
            Email::new("a@l.io").unwrap(),
            hash,
        ));

        Fixture {
            users: Arc::new(users),
            hasher: Arc::new(hasher),
            mailer: Arc::new(mailer),
        }
    }

    fn use_case(
        fx: &Fixture,
    ) -> ResetPasswordUseCase<
        InMemoryUserRepository,
        BcryptPasswordHasher,
        RandomPasswordGenerator,
        RecordingMailer,
    > {
        ResetPasswordUseCase::new(
            fx.users.clone(),
            fx.hasher.clone(),
            Arc::new(RandomPasswordGenerator::new(8)),
            fx.mailer.clone(),
        )
    }

    #[tokio::test]
    async fn test_reset_rotates_and_mails_the_new_password() {
        let fx = fixture(RecordingMailer::new()).await;
        use_case(&fx).execute("a@l.io".into()).await.unwrap();

        let sent = fx.mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "a@l.io");
        assert_eq!(sent[0].first_name, "Ada");
        assert_eq!(sent[0].new_password.len(), 8);

        let user = fx.users.get_by_email("a@l.io").unwrap();
        let new_password = RawPassword::generated(sent[0].new_password.clone());
        assert!(
            PasswordHasher::verify(fx.hasher.as_ref(), &user.password_hash, &new_password)
                .await
                .is_ok()
        );
        let old_password = RawPassword::for_login("secret1".into()).unwrap();
        assert!(
            PasswordHasher::verify(fx.hasher.as_ref(), &user.password_hash, &old_password)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_rotation() {
        let fx = fixture(RecordingMailer::failing()).await;
        let before = fx.users.get_by_email("a@l.io").unwrap().password_hash;

        let err = use_case(&fx).execute("a@l.io".into()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);

        let after = fx.users.get_by_email("a@l.io").unwrap().password_hash;
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_unknown_email() {
        let fx = fixture(RecordingMailer::new()).await;
        let err = use_case(&fx).execute("z@l.io".into()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EntityNotFound);
        assert!(fx.mailer.sent().is_empty());
    }
}
