use pawhaven_shared::req_args::LoginReqArgs;
use std::time::Duration;
use uuid::Uuid;

/// How the login endpoint answers for a user with correct credentials
#[derive(Debug, Clone, Default)]
pub enum LoginBehavior {
    /// Hands out a freshly minted token
    #[default]
    Normal,
    /// Always hands out the same (possibly not decodable) token
    FixedToken(String),
    /// Answers 200 without the `data` field
    MissingData,
    /// Answers 200 with an empty token
    EmptyToken,
}

/// What the role endpoint returns
#[derive(Debug, Clone)]
pub enum RolesBehavior {
    Roles(Vec<String>),
    /// `{"roles": null}`
    Null,
    NotFound,
    ServerError,
}

/// What the shelter affiliation endpoint returns
#[derive(Debug, Clone, Default)]
pub enum ShelterBehavior {
    Found(u64),
    #[default]
    NotFound,
    ServerError,
}

#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: u64,
    pub email: String,
    pub password: String,
    pub username: String,
    pub login: LoginBehavior,
    pub roles: RolesBehavior,
    pub shelter: ShelterBehavior,
    /// Delay before the role endpoint answers
    pub roles_delay: Option<Duration>,
}

impl TestUser {
    pub fn generate(id: u64, roles: &[&str]) -> Self {
        let unique = Uuid::new_v4().simple().to_string();
        Self {
            id,
            email: format!("user{id}-{}@example.com", &unique[..8]),
            password: Uuid::new_v4().to_string(),
            username: format!("user{id}"),
            login: LoginBehavior::default(),
            roles: RolesBehavior::Roles(roles.iter().map(|x| x.to_string()).collect()),
            shelter: ShelterBehavior::default(),
            roles_delay: None,
        }
    }

    pub fn with_credentials(mut self, email: &str, password: &str) -> Self {
        self.email = email.to_string();
        self.password = password.to_string();
        self
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn with_login(mut self, login: LoginBehavior) -> Self {
        self.login = login;
        self
    }

    pub fn with_roles(mut self, roles: RolesBehavior) -> Self {
        self.roles = roles;
        self
    }

    pub fn with_shelter(mut self, shelter: ShelterBehavior) -> Self {
        self.shelter = shelter;
        self
    }

    pub fn with_roles_delay(mut self, delay: Duration) -> Self {
        self.roles_delay = Some(delay);
        self
    }

    pub fn login_args(&self) -> LoginReqArgs {
        LoginReqArgs::new(self.email.clone(), self.password.clone().into())
    }
}
