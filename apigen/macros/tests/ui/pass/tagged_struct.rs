use apigen::ApiParams;

/// Tags are accepted and the struct is left untouched.
#[derive(ApiParams, Debug, Default)]
pub struct ProfileParams {
    #[apivalidator("paramname=login,required")]
    pub login: String,
    #[apivalidator("enum=male|female,default=male")]
    pub sex: String,
    #[apivalidator("min=0,max=128")]
    pub age: i32,
    pub note: String,
}

fn main() {
    let params = ProfileParams {
        login: "bob".to_string(),
        ..ProfileParams::default()
    };
    assert_eq!(params.login, "bob");
    assert_eq!(params.age, 0);
}
