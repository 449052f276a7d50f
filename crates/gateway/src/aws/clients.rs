//! AWS SDK client bundle.

use aws_config::{BehaviorVersion, Region};

/// AWS SDK clients shared by both bucket stores.
///
/// Both stores clone the same [`aws_sdk_s3::Client`] so that credentials are
/// resolved once and the connection pool is shared.
#[derive(Clone, Debug)]
pub struct AwsClients {
    pub s3: aws_sdk_s3::Client,
}

impl AwsClients {
    /// Load the SDK config for `region` and build the S3 client.
    ///
    /// With an `endpoint_url` override the client switches to path-style
    /// addressing, which S3-compatible stores expect.
    pub async fn init(region: &str, endpoint_url: Option<&str>) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        let mut s3_config = aws_sdk_s3::config::Builder::from(&config);
        if let Some(url) = endpoint_url {
            s3_config = s3_config.endpoint_url(url).force_path_style(true);
        }

        Self {
            s3: aws_sdk_s3::Client::from_conf(s3_config.build()),
        }
    }
}
