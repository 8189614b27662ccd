//! Defines connection versioning type and functions

use core::fmt::Display;

use interlink_primitives::prelude::*;
use interlink_primitives::utils::PrettySlice;

use crate::error::ConnectionError;

/// Stores the identifier and the features supported by a version
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash, borsh::BorshSerialize, borsh::BorshDeserialize)]
pub struct Version {
    /// unique version identifier
    identifier: String,
    /// list of features compatible with the specified identifier
    features: Vec<String>,
}

impl Version {
    pub fn new(identifier: String, features: Vec<String>) -> Result<Self, ConnectionError> {
        let version = Self {
            identifier,
            features,
        };
        version.validate()?;
        Ok(version)
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Rejects blank identifiers and blank features.
    pub fn validate(&self) -> Result<(), ConnectionError> {
        if self.identifier.trim().is_empty() {
            return Err(ConnectionError::EmptyVersions);
        }
        if self.features.iter().any(|f| f.trim().is_empty()) {
            return Err(ConnectionError::EmptyFeatures);
        }
        Ok(())
    }

    /// Checks whether the version has a matching version identifier and its
    /// feature set is a subset of the supported features
    pub fn verify_is_supported(
        &self,
        supported_versions: &[Version],
    ) -> Result<(), ConnectionError> {
        let maybe_supported_version = find_supported_version(self, supported_versions)?;

        if self.features.is_empty() {
            return Err(ConnectionError::EmptyFeatures);
        }

        for feature in self.features.iter() {
            maybe_supported_version.verify_feature_supported(feature.to_string())?;
        }
        Ok(())
    }

    /// Checks whether the given feature is supported in this version
    pub fn verify_feature_supported(&self, feature: String) -> Result<(), ConnectionError> {
        if !self.features.contains(&feature) {
            return Err(ConnectionError::FeatureNotSupported { feature });
        }
        Ok(())
    }

    /// Returns the lists of supported versions
    pub fn compatibles() -> Vec<Self> {
        vec![Self {
            identifier: "1".to_string(),
            features: vec!["ORDER_ORDERED".to_string(), "ORDER_UNORDERED".to_string()],
        }]
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Version {{ identifier: {}, features: {} }}",
            self.identifier,
            PrettySlice(&self.features)
        )
    }
}

/// Picks the version both chains support: walks the host's supported
/// versions, keeps each one whose identifier the counterparty also proposes
/// with a non-empty feature intersection, and returns the lowest identifier
/// among them. Used by `conn_open_try`.
pub fn pick_version(
    supported_versions: &[Version],
    counterparty_versions: &[Version],
) -> Result<Version, ConnectionError> {
    let mut intersection: Vec<Version> = Vec::new();
    for sv in supported_versions.iter() {
        if let Ok(cv) = find_supported_version(sv, counterparty_versions) {
            if let Ok(feature_set) = get_feature_set_intersection(&sv.features, &cv.features) {
                intersection.push(Version {
                    identifier: cv.identifier,
                    features: feature_set,
                })
            }
        }
    }

    intersection.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    intersection
        .into_iter()
        .next()
        .ok_or(ConnectionError::NoCommonVersion)
}

fn find_supported_version(
    version: &Version,
    supported_versions: &[Version],
) -> Result<Version, ConnectionError> {
    supported_versions
        .iter()
        .find(|sv| sv.identifier == version.identifier)
        .ok_or(ConnectionError::VersionNotSupported {
            version: version.clone(),
        })
        .cloned()
}

fn get_feature_set_intersection(
    supported_features: &[String],
    counterparty_features: &[String],
) -> Result<Vec<String>, ConnectionError> {
    let feature_set_intersection: Vec<String> = supported_features
        .iter()
        .filter(|f| counterparty_features.contains(f))
        .cloned()
        .collect();

    if feature_set_intersection.is_empty() {
        return Err(ConnectionError::NoCommonFeatures);
    }

    Ok(feature_set_intersection)
}

#[cfg(test)]
mod tests {
    use interlink_primitives::prelude::*;
    use rstest::rstest;

    use crate::error::ConnectionError;
    use crate::version::{pick_version, Version};

    fn version(id: &str, features: &[&str]) -> Version {
        Version::new(id.to_string(), features.iter().map(|f| f.to_string()).collect()).unwrap()
    }

    #[rstest]
    #[case::same(
        vec![version("1", &["ORDER_ORDERED", "ORDER_UNORDERED"])],
        vec![version("1", &["ORDER_ORDERED", "ORDER_UNORDERED"])],
        version("1", &["ORDER_ORDERED", "ORDER_UNORDERED"]),
    )]
    #[case::feature_intersection(
        vec![version("1", &["ORDER_ORDERED", "ORDER_UNORDERED"])],
        vec![version("1", &["ORDER_UNORDERED", "ORDER_RANDOM"])],
        version("1", &["ORDER_UNORDERED"]),
    )]
    #[case::lowest_identifier(
        vec![version("2", &["ORDER_ORDERED"]), version("1", &["ORDER_ORDERED"])],
        vec![version("1", &["ORDER_ORDERED"]), version("2", &["ORDER_ORDERED"])],
        version("1", &["ORDER_ORDERED"]),
    )]
    fn test_pick_version(
        #[case] supported: Vec<Version>,
        #[case] counterparty: Vec<Version>,
        #[case] expected: Version,
    ) {
        assert_eq!(pick_version(&supported, &counterparty).unwrap(), expected);
    }

    #[rstest]
    #[case::disjoint_identifiers(vec![version("2", &["ORDER_ORDERED"])])]
    #[case::disjoint_features(vec![version("1", &["ORDER_RANDOM"])])]
    #[case::empty(vec![])]
    fn test_pick_version_without_common_version(#[case] counterparty: Vec<Version>) {
        assert!(matches!(
            pick_version(&Version::compatibles(), &counterparty),
            Err(ConnectionError::NoCommonVersion)
        ));
    }

    #[test]
    fn test_blank_versions_rejected() {
        assert!(Version::new(" ".to_string(), vec![]).is_err());
        assert!(Version::new("1".to_string(), vec!["".to_string()]).is_err());
    }

    #[test]
    fn test_verify_is_supported() {
        let supported = Version::compatibles();
        assert!(version("1", &["ORDER_ORDERED"])
            .verify_is_supported(&supported)
            .is_ok());
        assert!(version("1", &["ORDER_RANDOM"])
            .verify_is_supported(&supported)
            .is_err());
    }
}
