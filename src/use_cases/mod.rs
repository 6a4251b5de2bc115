pub mod dispatcher;
pub mod login;
pub mod logout;
pub mod registry;
pub mod signup;
pub mod verify_token;

#[cfg(test)]
pub(crate) mod test_support;
