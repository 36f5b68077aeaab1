//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_AUTH_CHANGE_PASSWORD: PathSpec = PathSpec::post("/auth/change-password");
    pub const PATH_AUTH_LOGIN: PathSpec = PathSpec::post("/auth/login");
    pub const PATH_AUTH_ME: PathSpec = PathSpec::get("/auth/me");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health_check");
}

pub mod storage {
    //! Key names in the durable key/value session storage. Kept identical to
    //! the identity provider's browser clients so a session written by either
    //! can be read by the other.
    pub const STORAGE_KEY_ACCESS_TOKEN: &str = "accessToken";
    pub const STORAGE_KEY_REFRESH_TOKEN: &str = "refreshToken";
    pub const STORAGE_KEY_USER: &str = "user";
}
