pub mod error;
pub mod parser;
pub mod requester;
pub mod validator;
