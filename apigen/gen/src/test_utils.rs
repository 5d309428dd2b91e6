//! Shared test utilities for apigen-gen tests.

use crate::descriptor::MethodDescriptor;

/// A unit with one receiver, two handlers and their request structs.
pub const PROFILE_SOURCE: &str = r#"
pub struct MyApi;

pub struct ProfileParams {
    #[apivalidator("paramname=login,required")]
    pub login: String,
    #[apivalidator("enum=male|female,default=male")]
    pub sex: String,
}

pub struct CreateParams {
    #[apivalidator("required,min=3")]
    pub login: String,
    #[apivalidator("min=1,max=128")]
    pub age: i32,
}

/// Not referenced by any handler.
pub struct Unused {
    pub ratio: f64,
}

impl MyApi {
    /// apigen:api {"url": "/user/profile", "auth": true, "method": "GET"}
    pub async fn profile(&self, ctx: &RequestContext, params: ProfileParams) -> Result<User, ApiError> {
        todo!()
    }

    /// apigen:api {"url": "/user/create", "auth": true, "method": "POST"}
    pub async fn create(&self, ctx: &RequestContext, params: CreateParams) -> Result<User, ApiError> {
        todo!()
    }

    fn helper(&self) {}
}
"#;

/// Creates a descriptor whose request type is derived from the method name.
///
/// `profile` gets `ProfileParams`; the handler is async and borrows its context.
pub fn make_descriptor(
    receiver: &str,
    method: &str,
    route: &str,
    verb: Option<&str>,
    requires_auth: bool,
) -> MethodDescriptor {
    let bare = method.trim_start_matches("r#");
    let mut chars = bare.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };

    MethodDescriptor {
        receiver_type: receiver.to_string(),
        request_type: format!("{}Params", capitalized),
        method_name: method.to_string(),
        route: route.to_string(),
        verb: verb.map(str::to_string),
        requires_auth,
        is_async: true,
        context_by_ref: true,
    }
}
