//! User accounts API.

use std::sync::RwLock;

use apigen::http::StatusCode;
use apigen::{ApiError, ApiParams, HandlerError, RequestContext};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub role: String,
    pub age: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Profile {
    pub login: String,
    pub sex: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewUser {
    pub id: u64,
}

#[derive(Debug, Default, ApiParams)]
pub struct ProfileParams {
    #[apivalidator("paramname=login,required")]
    pub login: String,
    #[apivalidator("enum=male|female,default=male")]
    pub sex: String,
}

#[derive(Debug, Default, ApiParams)]
pub struct CreateParams {
    #[apivalidator("required,min=3")]
    pub login: String,
    #[apivalidator("enum=user|admin,default=user")]
    pub role: String,
    #[apivalidator("min=1,max=128")]
    pub age: i32,
}

#[derive(Debug, Default, ApiParams)]
pub struct LookupParams {
    #[apivalidator("required")]
    pub login: String,
}

#[derive(Debug, Default, ApiParams)]
pub struct OtherCreateParams {
    #[apivalidator("required,min=3")]
    pub username: String,
    #[apivalidator("paramname=account_name")]
    pub name: String,
    #[apivalidator("enum=warrior|sorcerer|rouge,default=warrior")]
    pub class: String,
    #[apivalidator("min=1,max=50")]
    pub level: u8,
}

/// Both defaults fall outside their own constraints.
#[derive(Debug, Default, ApiParams)]
pub struct RenameParams {
    #[apivalidator("default=al,min=3")]
    pub nickname: String,
    #[apivalidator("enum=red|green,default=blue")]
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rename {
    pub nickname: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Character {
    pub username: String,
    pub name: String,
    pub class: String,
    pub level: u8,
}

/// In-memory user registry.
#[derive(Debug, Default)]
pub struct MyApi {
    users: RwLock<Vec<User>>,
}

fn store_unavailable() -> ApiError {
    ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "user store unavailable")
}

impl MyApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// apigen:api {"url": "/user/profile", "auth": true, "method": "GET"}
    pub async fn profile(&self, _ctx: &RequestContext, params: ProfileParams) -> Result<Profile, ApiError> {
        Ok(Profile {
            login: params.login,
            sex: params.sex,
        })
    }

    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    pub async fn create(&self, _ctx: &RequestContext, params: CreateParams) -> Result<NewUser, HandlerError> {
        if params.login == "boom" {
            return Err("storage backend is down".into());
        }

        let mut users = self.users.write().map_err(|_| store_unavailable())?;
        if users.iter().any(|user| user.login == params.login) {
            return Err(ApiError::new(StatusCode::CONFLICT, "user exists").into());
        }

        let id = users.len() as u64 + 1;
        users.push(User {
            id,
            login: params.login,
            role: params.role,
            age: params.age,
        });
        Ok(NewUser { id })
    }

    // No verb of its own: dispatch still requires POST, inherited from `create`.
    /// apigen:api {"url": "/user/lookup"}
    pub fn lookup(&self, _ctx: RequestContext, params: LookupParams) -> Result<User, ApiError> {
        let users = self.users.read().map_err(|_| store_unavailable())?;
        users
            .iter()
            .find(|user| user.login == params.login)
            .cloned()
            .ok_or_else(|| ApiError::new(StatusCode::NOT_FOUND, "user not found"))
    }
}

/// Second receiver sharing a route with [`MyApi`].
#[derive(Debug, Default)]
pub struct OtherApi;

impl OtherApi {
    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    pub async fn create(&self, _ctx: &RequestContext, params: OtherCreateParams) -> Result<Character, ApiError> {
        Ok(Character {
            username: params.username,
            name: params.name,
            class: params.class,
            level: params.level,
        })
    }

    /// apigen:api {"url": "/user/rename"}
    pub async fn rename(&self, _ctx: &RequestContext, params: RenameParams) -> Result<Rename, ApiError> {
        Ok(Rename {
            nickname: params.nickname,
            color: params.color,
        })
    }
}

include!(concat!(env!("OUT_DIR"), "/api_handlers.rs"));
