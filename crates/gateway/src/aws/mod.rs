//! AWS SDK client initialisation.
//!
//! Credentials come from the standard provider chain (environment, profile,
//! instance role). `S3_ENDPOINT_URL` points the S3 client at an
//! S3-compatible store such as MinIO or LocalStack.

pub mod clients;

pub use clients::AwsClients;
