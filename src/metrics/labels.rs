//! Label types for Prometheus metrics

use prometheus_client::encoding::EncodeLabelSet;

use crate::provider::MetricType;

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct MetricLabels {
    pub metric: String,
}

impl From<MetricType> for MetricLabels {
    fn from(metric: MetricType) -> Self {
        Self {
            metric: metric.as_str().to_string(),
        }
    }
}

#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct AuthorizationLabels {
    pub outcome: String,
}
