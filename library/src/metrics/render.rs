use std::collections::BTreeMap;
use std::fmt;

/// Kind of a metric in the Prometheus data model
#[derive(Debug)]
pub enum MetricType {
    /// Monotonically increasing value
    Counter,
    /// Distribution of observations in cumulative buckets
    Histogram,
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

/// Single sample belonging to a [`Metric`]
pub struct MetricValue {
    /// Postfix appended to the metric name (e.g. `_bucket` for histograms)
    pub name_postfix: Option<String>,
    /// Labels attached to this sample
    pub labels: BTreeMap<String, String>,
    /// Sample value
    pub value: f64,
}

impl MetricValue {
    /// Creates a plain sample with no labels or postfix
    pub fn from_value(value: f64) -> Self {
        Self {
            value,
            labels: BTreeMap::new(),
            name_postfix: None,
        }
    }

    /// Appends a postfix to the metric name for this sample
    pub fn with_name_postfix(mut self, postfix: &str) -> Self {
        self.name_postfix = Some(postfix.to_string());
        self
    }

    /// Attaches a label to this sample
    pub fn with_label(mut self, key: &str, value: &str) -> Self {
        self.labels.insert(key.to_string(), value.to_string());
        self
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.name_postfix.clone().unwrap_or_else(|| "".to_string())
        )?;

        if !self.labels.is_empty() {
            let mut formatted_labels =
                self.labels.iter().fold(String::new(), |res, (key, value)| {
                    res + &format!("{}=\"{}\"", key, value) + ","
                });

            // Remove trailing comma
            formatted_labels.pop();

            write!(f, "{{{}}}", formatted_labels)?;
        }

        write!(f, " {}", self.value)
    }
}

/// Named metric with its description and samples
pub struct Metric {
    /// Human readable description emitted as a `HELP` line
    pub description: String,
    /// Kind of the metric, emitted as a `TYPE` line
    pub metric_type: MetricType,

    /// Name of the metric
    pub name: String,
    /// Samples belonging to the metric
    pub values: Vec<MetricValue>,
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted_description = format!("# HELP {} {}", self.name, self.description);
        let formatted_metric_type = format!("# TYPE {} {}", self.name, self.metric_type);
        let formatted_values = self.values.iter().fold(String::new(), |res, value| {
            res + &format!("{}{}", self.name, value) + "\n"
        });

        write!(
            f,
            "{}\n{}\n{}",
            formatted_description, formatted_metric_type, formatted_values
        )
    }
}

#[cfg(test)]
mod does {
    use super::*;

    fn plain_value(value: f64) -> MetricValue {
        MetricValue {
            name_postfix: None,
            labels: BTreeMap::new(),
            value,
        }
    }

    #[test]
    fn format_value_without_labels() {
        let actual = format!("{}", plain_value(10.0));
        assert_eq!(actual, " 10");
    }

    #[test]
    fn format_value_with_label() {
        let value = plain_value(10.0).with_label("test", "label");
        assert_eq!(format!("{}", value), "{test=\"label\"} 10");
    }

    #[test]
    fn format_value_with_multiple_labels() {
        let value = plain_value(10.0)
            .with_label("test", "label")
            .with_label("other", "labelvalue");

        // Labels are stored in a BTreeMap and thus rendered in key order
        assert_eq!(
            format!("{}", value),
            "{other=\"labelvalue\",test=\"label\"} 10"
        );
    }

    #[test]
    fn format_value_with_postfix() {
        let value = plain_value(3.0)
            .with_name_postfix("_bucket")
            .with_label("le", "0.5");

        assert_eq!(format!("{}", value), "_bucket{le=\"0.5\"} 3");
    }

    #[test]
    fn format_metric_without_values() {
        let metric = Metric {
            description: "TestDescription".to_string(),
            metric_type: MetricType::Counter,

            name: "test_metric".to_string(),
            values: Vec::new(),
        };

        let actual = format!("{}", metric);
        let expected = "# HELP test_metric TestDescription\n# TYPE test_metric counter\n";

        assert_eq!(actual, expected);
    }

    #[test]
    fn format_metric_with_value() {
        let metric = Metric {
            description: "TestDescription".to_string(),
            metric_type: MetricType::Counter,

            name: "test_metric".to_string(),
            values: vec![plain_value(10.0)],
        };

        let actual = format!("{}", metric);
        let expected =
            "# HELP test_metric TestDescription\n# TYPE test_metric counter\ntest_metric 10\n";

        assert_eq!(actual, expected);
    }
}
