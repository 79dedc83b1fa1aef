use sqlite::Value;

/// Where clause builder.
///
/// Parameters use the `?*` placeholder in expressions, replaced by numbered
/// `?N` binds when the condition is expanded. Conditions compose with
/// [and_where][Self::and_where].
#[derive(Clone)]
pub struct WhereCondition {
    expressions: Vec<String>,
    parameters: Vec<Value>,
}

impl Default for WhereCondition {
    /// The default condition matches every row.
    fn default() -> Self {
        Self {
            expressions: Vec::new(),
            parameters: Vec::new(),
        }
    }
}

impl WhereCondition {
    /// Create a condition from an expression and its parameters.
    pub fn new(expression: &str, parameters: Vec<Value>) -> Self {
        Self {
            expressions: vec![expression.to_string()],
            parameters,
        }
    }

    /// Create a condition with an `in` statement over the given parameters.
    pub fn where_in(field: &str, parameters: Vec<Value>) -> Self {
        let placeholders = vec!["?*"; parameters.len()].join(", ");

        Self {
            expressions: vec![format!("{field} in ({placeholders})")],
            parameters,
        }
    }

    /// Combine with another condition using an `and` operator.
    pub fn and_where(mut self, mut condition: WhereCondition) -> Self {
        self.expressions.append(&mut condition.expressions);
        self.parameters.append(&mut condition.parameters);

        self
    }

    /// Turn the condition into its SQL representation and parameter list.
    pub fn expand(&self) -> (String, Vec<Value>) {
        let expression = if self.expressions.is_empty() {
            "true".to_string()
        } else {
            self.expressions.join(" and ")
        };

        // Replace `?*` placeholders by numbered parameters.
        let mut expanded = String::new();
        for (index, part) in expression.split("?*").enumerate() {
            if index > 0 {
                expanded.push('?');
                expanded.push_str(&index.to_string());
            }
            expanded.push_str(part);
        }

        (expanded, self.parameters.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_condition_matches_everything() {
        let (sql, params) = WhereCondition::default().expand();

        assert_eq!("true", sql);
        assert!(params.is_empty());
    }

    #[test]
    fn expression_parameters_are_numbered() {
        let condition = WhereCondition::new(
            "status = ?*",
            vec![Value::String("pending".to_string())],
        )
        .and_where(WhereCondition::new(
            "certificate_id = ?*",
            vec![Value::String("whatever".to_string())],
        ));
        let (sql, params) = condition.expand();

        assert_eq!("status = ?1 and certificate_id = ?2", sql);
        assert_eq!(2, params.len());
    }

    #[test]
    fn where_in_expands_one_placeholder_per_parameter() {
        let condition = WhereCondition::where_in(
            "certificate_id",
            vec![
                Value::String("a".to_string()),
                Value::String("b".to_string()),
            ],
        );
        let (sql, params) = condition.expand();

        assert_eq!("certificate_id in (?1, ?2)", sql);
        assert_eq!(2, params.len());
    }
}
