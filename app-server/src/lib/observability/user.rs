use async_trait::async_trait;

use super::observe_call;
use super::CallSite;
use super::SlowCallPolicy;
use crate::domain::user::errors::UserError;
use crate::domain::user::models::CreateUserCommand;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;

const SERVICE_COMPONENT: &str = "UserService";
const REPOSITORY_COMPONENT: &str = "UserRepository";

/// [`UserServicePort`] decorator timing and logging every service call.
pub struct ObservedUserService<S> {
    inner: S,
}

impl<S: UserServicePort> ObservedUserService<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<S: UserServicePort> UserServicePort for ObservedUserService<S> {
    async fn create_user(&self, command: CreateUserCommand) -> Result<User, UserError> {
        let site = CallSite::new(SERVICE_COMPONENT, "create_user")
            .with_arguments(format!("email={}", command.email));

        observe_call(site, SlowCallPolicy::SERVICE, self.inner.create_user(command)).await
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        let site = CallSite::new(SERVICE_COMPONENT, "get_user").with_arguments(format!("id={}", id));

        observe_call(site, SlowCallPolicy::SERVICE, self.inner.get_user(id)).await
    }

    async fn get_user_by_email(&self, email: &EmailAddress) -> Result<User, UserError> {
        let site = CallSite::new(SERVICE_COMPONENT, "get_user_by_email")
            .with_arguments(format!("email={}", email));

        observe_call(
            site,
            SlowCallPolicy::SERVICE,
            self.inner.get_user_by_email(email),
        )
        .await
    }
}

/// [`UserRepository`] decorator flagging slow and failed store calls.
pub struct ObservedUserRepository<R> {
    inner: R,
}

impl<R: UserRepository> ObservedUserRepository<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl<R: UserRepository> UserRepository for ObservedUserRepository<R> {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let site = CallSite::new(REPOSITORY_COMPONENT, "create")
            .with_arguments(format!("email={}", user.email));

        observe_call(site, SlowCallPolicy::STORE, self.inner.create(user)).await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let site = CallSite::new(REPOSITORY_COMPONENT, "find_by_id").with_arguments(format!("id={}", id));

        observe_call(site, SlowCallPolicy::STORE, self.inner.find_by_id(id)).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        let site = CallSite::new(REPOSITORY_COMPONENT, "find_by_email")
            .with_arguments(format!("email={}", email));

        observe_call(site, SlowCallPolicy::STORE, self.inner.find_by_email(email)).await
    }
}
