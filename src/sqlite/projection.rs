/// Named source aliases used to expand the `{:table:}` placeholders of a
/// [Projection] into actual table names or aliases.
pub struct SourceAlias {
    aliases: Vec<(String, String)>,
}

impl SourceAlias {
    /// SourceAlias factory, takes `(placeholder, actual_name)` pairs.
    pub fn new(aliases: &[(&str, &str)]) -> Self {
        Self {
            aliases: aliases
                .iter()
                .map(|(alias, source)| (alias.to_string(), source.to_string()))
                .collect(),
        }
    }
}

/// A single output field of a query: its definition (`table.column` or an
/// SQL expression) and the name it is aliased to.
pub struct ProjectionField {
    /// Output name of the field.
    pub name: String,

    /// SQL definition of the field.
    pub definition: String,

    /// SQL type of the output data.
    pub output_type: String,
}

/// Definition of the field mapping of a query, expanded into the select (or
/// `returning`) clause.
pub struct Projection {
    fields: Vec<ProjectionField>,
}

impl Projection {
    /// Create a Projection from `(name, definition, sql_type)` tuples.
    pub fn from(fields: &[(&str, &str, &str)]) -> Self {
        Self {
            fields: fields
                .iter()
                .map(|(name, definition, output_type)| ProjectionField {
                    name: name.to_string(),
                    definition: definition.to_string(),
                    output_type: output_type.to_string(),
                })
                .collect(),
        }
    }

    /// Turn the projection into a string suitable for use in SQL queries,
    /// expanding source placeholders with the given aliases.
    pub fn expand(&self, aliases: SourceAlias) -> String {
        let mut projection = self
            .fields
            .iter()
            .map(|field| format!("{} as {}", field.definition, field.name))
            .collect::<Vec<String>>()
            .join(", ");

        for (alias, source) in &aliases.aliases {
            projection = projection.replace(alias, source);
        }

        projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_replaces_aliases() {
        let projection = Projection::from(&[
            ("certificate_id", "{:cert:}.certificate_id", "text"),
            ("status", "{:cert:}.status", "text"),
        ]);

        assert_eq!(
            "pc.certificate_id as certificate_id, pc.status as status",
            projection.expand(SourceAlias::new(&[("{:cert:}", "pc")]))
        );
    }
}
