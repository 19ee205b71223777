/*!

Per-attribute validators. Each returns a [`ValidationError`] naming the attribute it was given.

!*/

use lazy_static::lazy_static;
use regex::Regex;
use resource_reconciler::provider::ValidationError;
use std::collections::BTreeMap;

const MAX_NAME_LEN: usize = 63;
const MAX_IMAGE_LEN: usize = 255;
const MAX_URL_LEN: usize = 1024;
const MAX_ENVIRONMENT_LEN: usize = 1024;

lazy_static! {
    static ref SAGEMAKER_NAME: Regex = Regex::new(r"^[0-9A-Za-z-]+$").unwrap();
    static ref SAGEMAKER_IMAGE: Regex = Regex::new(r"^[\S]+$").unwrap();
    static ref MODEL_DATA_URL: Regex = Regex::new(r"^(https|s3)://([^/]+)/?(.*)$").unwrap();
    static ref ENVIRONMENT_KEY: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();
    static ref ARN_PARTITION: Regex = Regex::new(r"^aws(-[a-z]+)*$").unwrap();
    static ref ARN_REGION: Regex = Regex::new(r"^[a-z]{2}(-[a-z]+)+-\d$").unwrap();
    static ref ARN_ACCOUNT: Regex = Regex::new(r"^(aws|\d{12})$").unwrap();
}

pub(crate) fn not_empty(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::new(
            attribute,
            format!("{} must not be empty", attribute),
        ));
    }
    Ok(())
}

/// Model and container host names.
pub(crate) fn sagemaker_name(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if !SAGEMAKER_NAME.is_match(value) {
        return Err(ValidationError::new(
            attribute,
            format!(
                "only alphanumeric characters and hyphens allowed in {}: '{}'",
                attribute, value
            ),
        ));
    }
    max_len(attribute, value, MAX_NAME_LEN)
}

pub(crate) fn sagemaker_image(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if !SAGEMAKER_IMAGE.is_match(value) {
        return Err(ValidationError::new(
            attribute,
            format!("{} must not contain whitespace: '{}'", attribute, value),
        ));
    }
    max_len(attribute, value, MAX_IMAGE_LEN)
}

pub(crate) fn model_data_url(attribute: &str, value: &str) -> Result<(), ValidationError> {
    if !MODEL_DATA_URL.is_match(value) {
        return Err(ValidationError::new(
            attribute,
            format!(
                "{} must be a valid S3 or HTTPS URL: '{}'",
                attribute, value
            ),
        ));
    }
    max_len(attribute, value, MAX_URL_LEN)
}

pub(crate) fn environment(
    attribute: &str,
    environment: &BTreeMap<String, String>,
) -> Result<(), ValidationError> {
    for (key, value) in environment {
        if !ENVIRONMENT_KEY.is_match(key) {
            return Err(ValidationError::new(
                attribute,
                format!("{} has an invalid variable name: '{}'", attribute, key),
            ));
        }
        max_len(attribute, key, MAX_ENVIRONMENT_LEN)?;
        max_len(attribute, value, MAX_ENVIRONMENT_LEN)?;
    }
    Ok(())
}

/// `arn:{partition}:{service}:{region}:{account}:{resource}`. Region and account may be empty, as
/// they are for IAM. The account of AWS-managed resources is `aws`.
pub(crate) fn arn(attribute: &str, value: &str) -> Result<(), ValidationError> {
    let invalid = |reason: String| {
        Err(ValidationError::new(
            attribute,
            format!("{} ('{}') is an invalid ARN: {}", attribute, value, reason),
        ))
    };
    let sections: Vec<&str> = value.splitn(6, ':').collect();
    if sections.len() != 6 || sections[0] != "arn" {
        return invalid("expected 'arn:partition:service:region:account:resource'".to_string());
    }
    let (partition, service, region, account, resource) = (
        sections[1],
        sections[2],
        sections[3],
        sections[4],
        sections[5],
    );
    if !ARN_PARTITION.is_match(partition) {
        return invalid(format!("invalid partition value '{}'", partition));
    }
    if service.is_empty() {
        return invalid("missing service".to_string());
    }
    if !region.is_empty() && !ARN_REGION.is_match(region) {
        return invalid(format!("invalid region value '{}'", region));
    }
    if !account.is_empty() && !ARN_ACCOUNT.is_match(account) {
        return invalid(format!("invalid account ID value '{}'", account));
    }
    if resource.is_empty() {
        return invalid("missing resource".to_string());
    }
    Ok(())
}

fn max_len(attribute: &str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.len() > max {
        return Err(ValidationError::new(
            attribute,
            format!("{} cannot be longer than {} characters", attribute, max),
        ));
    }
    Ok(())
}
