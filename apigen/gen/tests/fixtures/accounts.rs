use apigen::{ApiError, ApiParams, RequestContext};

pub struct Accounts;

pub struct Audit;

#[derive(Default, ApiParams)]
pub struct ProfileParams {
    #[apivalidator("paramname=login,required")]
    pub login: String,
    #[apivalidator("enum=male|female,default=male")]
    pub sex: String,
}

#[derive(Default, ApiParams)]
pub struct CreateParams {
    #[apivalidator("required,min=3")]
    pub login: String,
    #[apivalidator("enum=user|admin,default=user")]
    pub role: String,
    #[apivalidator("min=1,max=128")]
    pub age: i32,
}

#[derive(Default, ApiParams)]
pub struct LookupParams {
    pub id: u64,
}

#[derive(Default, ApiParams)]
pub struct EventsParams {
    #[apivalidator("max=100")]
    pub limit: u32,
}

/// Never used as a request type.
pub struct Settings {
    pub ratio: f64,
}

pub struct User {
    pub login: String,
}

impl Accounts {
    /// apigen:api {"url": "/user/profile", "auth": true, "method": "GET"}
    pub async fn profile(&self, ctx: &RequestContext, params: ProfileParams) -> Result<User, ApiError> {
        todo!()
    }

    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    pub async fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, ApiError> {
        todo!()
    }

    /// apigen:api {"url": "/user/lookup"}
    pub fn lookup(&self, ctx: RequestContext, params: LookupParams) -> Result<User, ApiError> {
        todo!()
    }

    pub fn helper(&self) {}
}

impl Audit {
    /// apigen:api {"url": "/audit/events"}
    pub async fn events(&self, ctx: &RequestContext, params: EventsParams) -> Result<Vec<String>, ApiError> {
        todo!()
    }
}
