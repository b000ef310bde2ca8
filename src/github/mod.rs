pub mod client;
pub mod error;
pub mod graphql;

pub use client::GraphQLClient;
pub use graphql::graphql_types;
