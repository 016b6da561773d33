//! SQLite output with one table per relation.
//!
//! Relation tables are replaced when the sink is created. All rows are
//! inserted inside a single transaction that is committed by
//! [`RelationSink::finish`]; a run that is never finished leaves the tables
//! empty.

use camino::Utf8Path;
use log::debug;
use osmshape_core::{Bundle, FieldType, Relation, Row, Schema};
use rusqlite::{Connection, params_from_iter};

use super::{RelationSink, SinkError};

/// File name used when a sink is created inside an output directory.
pub const DATABASE_FILE_NAME: &str = "osm.db";

/// Writes the relations to SQLite tables named after them.
pub struct SqliteSink {
    connection: Connection,
    open_transaction: bool,
}

impl SqliteSink {
    /// Create (or open) the database at `path` and replace its relation tables.
    pub fn create(path: &Utf8Path) -> Result<Self, SinkError> {
        let connection = Connection::open(path.as_std_path()).map_err(|source| {
            SinkError::Sqlite {
                operation: "open the database",
                source,
            }
        })?;
        debug!("writing relations to SQLite database {path}");
        Self::from_connection(connection)
    }

    /// Replace the relation tables on an existing connection and open the
    /// transaction.
    pub fn from_connection(connection: Connection) -> Result<Self, SinkError> {
        connection
            .execute_batch(&create_tables_sql())
            .map_err(|source| SinkError::Sqlite {
                operation: "create tables",
                source,
            })?;
        connection
            .execute_batch("BEGIN")
            .map_err(|source| SinkError::Sqlite {
                operation: "begin a transaction",
                source,
            })?;
        Ok(Self {
            connection,
            open_transaction: true,
        })
    }

    /// The underlying connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Release the connection.
    #[must_use]
    pub fn into_connection(self) -> Connection {
        self.connection
    }

    fn insert<R: Row>(&self, relation: Relation, row: &R) -> Result<(), SinkError> {
        if !self.open_transaction {
            return Err(SinkError::Finished);
        }
        let mut statement = self
            .connection
            .prepare_cached(&insert_sql(relation))
            .map_err(|source| SinkError::Sqlite {
                operation: "prepare an insert",
                source,
            })?;
        let values = row.values(relation);
        statement
            .execute(params_from_iter(values.iter().map(AsRef::<str>::as_ref)))
            .map_err(|source| SinkError::Sqlite {
                operation: "insert a row",
                source,
            })?;
        Ok(())
    }
}

impl RelationSink for SqliteSink {
    fn write(&mut self, bundle: &Bundle) -> Result<(), SinkError> {
        match bundle {
            Bundle::Node(node) => {
                self.insert(Relation::Nodes, &node.node)?;
                for tag in &node.tags {
                    self.insert(Relation::NodeTags, tag)?;
                }
            }
            Bundle::Way(way) => {
                self.insert(Relation::Ways, &way.way)?;
                for way_node in &way.way_nodes {
                    self.insert(Relation::WayNodes, way_node)?;
                }
                for tag in &way.tags {
                    self.insert(Relation::WayTags, tag)?;
                }
            }
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<(), SinkError> {
        if !self.open_transaction {
            return Ok(());
        }
        self.open_transaction = false;
        self.connection
            .execute_batch("COMMIT")
            .map_err(|source| SinkError::Sqlite {
                operation: "commit the transaction",
                source,
            })
    }
}

fn quote(identifier: &str) -> String {
    format!("\"{identifier}\"")
}

fn column_type(relation: Relation, field: &str) -> &'static str {
    let declared = Schema::default()
        .relation(relation)
        .and_then(|contract| contract.rule(field))
        .map(|rule| rule.field_type);
    match declared {
        Some(FieldType::Integer) => "INTEGER",
        Some(FieldType::Float) => "REAL",
        Some(FieldType::String) | None => "TEXT",
    }
}

fn create_tables_sql() -> String {
    Relation::ALL
        .into_iter()
        .map(|relation| {
            let columns: Vec<String> = relation
                .fields()
                .iter()
                .map(|field| format!("{} {}", quote(field), column_type(relation, field)))
                .collect();
            let table = quote(relation.name());
            format!(
                "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({});\n",
                columns.join(", ")
            )
        })
        .collect()
}

fn insert_sql(relation: Relation) -> String {
    let fields = relation.fields();
    let columns: Vec<String> = fields.iter().map(|field| quote(field)).collect();
    let placeholders: Vec<String> = (1..=fields.len()).map(|index| format!("?{index}")).collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote(relation.name()),
        columns.join(", "),
        placeholders.join(", ")
    )
}
