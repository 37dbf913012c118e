//! Client lookup over a [`NormalizedTable`].
use crate::table::NormalizedTable;
use crate::table::Record;
use std::collections::BTreeMap;
use std::fmt::Display;
use tracing::debug;

/// Count of matching records sharing one container and transaction type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Group {
    pub container: String,
    /// Transaction type, empty when the record has none
    pub kind: String,
    pub count: usize,
}

/// Aggregate for a query that matched at least one record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Found {
    /// Client name of the first matching record
    pub client_name: String,
    /// Identifier of the first matching record
    pub client_id: String,
    /// Groups sorted by container, then transaction type
    pub groups: Vec<Group>,
    /// Number of matching records
    pub total: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryResult {
    NotFound,
    Found(Found),
}

impl QueryResult {
    pub fn is_found(&self) -> bool {
        matches!(self, QueryResult::Found(_))
    }
}

/// Finds the records whose client name or identifier contains `query`.
///
/// The query is trimmed and uppercased, then matched as a plain substring, so
/// `smi` finds `JOHN SMITH` and an empty query matches every record that has
/// a client or identifier. Every matching record is counted, even when the
/// matches belong to different clients; only the first one names the result.
pub fn search(table: &NormalizedTable, query: &str) -> QueryResult {
    let query = query.trim().to_uppercase();
    let matches: Vec<&Record> = table
        .records()
        .iter()
        .filter(|record| contains(&record.client, &query) || contains(&record.id, &query))
        .collect();

    let Some(first) = matches.first() else {
        debug!(query = %query, "No matching records");
        return QueryResult::NotFound;
    };

    let mut counts = BTreeMap::<(String, String), usize>::new();
    for record in &matches {
        let key = (record.container.to_owned(), table.transaction_type(record));
        *counts.entry(key).or_default() += 1;
    }
    let groups: Vec<Group> = counts
        .into_iter()
        .map(|((container, kind), count)| Group { container, kind, count })
        .collect();

    debug!(query = %query, records = matches.len(), groups = groups.len(), "Matched records");
    QueryResult::Found(Found {
        client_name: first.client.clone().unwrap_or_default(),
        client_id: first.id.clone().unwrap_or_default(),
        total: groups.iter().map(|group| group.count).sum(),
        groups,
    })
}

fn contains(field: &Option<String>, query: &str) -> bool {
    field.as_deref().is_some_and(|value| value.contains(query))
}

impl Display for Found {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let container_width = self
            .groups
            .iter()
            .map(|group| group.container.chars().count())
            .chain(["Caja".len()])
            .max()
            .unwrap_or_default();
        let kind_width = self
            .groups
            .iter()
            .map(|group| group.kind.chars().count())
            .chain(["TX".len()])
            .max()
            .unwrap_or_default();

        writeln!(f, "Cliente: {}", self.client_name)?;
        writeln!(f, "ID: {}", self.client_id)?;
        writeln!(f)?;
        writeln!(f, "{:<container_width$}  {:<kind_width$}  Cantidad", "Caja", "TX")?;
        for group in &self.groups {
            writeln!(f, "{:<container_width$}  {:<kind_width$}  {}", group.container, group.kind, group.count)?;
        }
        write!(f, "Total: {}", self.total)
    }
}

impl Display for QueryResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QueryResult::NotFound => write!(f, "Client not found."),
            QueryResult::Found(found) => found.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::normalize;
    use crate::options::LookupOptions;
    use crate::spreadsheet::fixtures;
    use crate::spreadsheet::fixtures::text;
    use crate::spreadsheet::Cell;
    use crate::spreadsheet::RawSheet;

    fn inventory() -> NormalizedTable {
        let sheet = RawSheet::from_rows("SOMBREROS", fixtures::inventory_rows());
        normalize(&sheet, &LookupOptions::default()).unwrap()
    }

    fn group(container: &str, kind: &str, count: usize) -> Group {
        Group {
            container: container.to_owned(),
            kind: kind.to_owned(),
            count,
        }
    }

    fn found(result: QueryResult) -> Found {
        match result {
            QueryResult::Found(found) => found,
            QueryResult::NotFound => panic!("expected a match"),
        }
    }

    #[test]
    fn groups_by_container_and_type() {
        let rows = vec![
            vec![Cell::Missing, text("CAJA")],
            vec![Cell::Missing, text("A")],
            vec![text("Cliente"), text("ID"), text("TX")],
            vec![text("John Smith"), text("X1"), text("IN")],
            vec![text("John Smith"), text("X1"), text("OUT")],
        ];
        let table = normalize(&RawSheet::from_rows("SOMBREROS", rows), &LookupOptions::default()).unwrap();
        let found = found(search(&table, "SMITH"));
        assert_eq!(found.client_name, "JOHN SMITH");
        assert_eq!(found.client_id, "X1");
        assert_eq!(found.groups, vec![group("A", "IN", 1), group("A", "OUT", 1)]);
        assert_eq!(found.total, 2);
    }

    #[test]
    fn substring_matches_across_clients() {
        let found = found(search(&inventory(), "  smith "));
        assert_eq!(found.client_name, "JOHN SMITH");
        assert_eq!(found.client_id, "X1");
        assert_eq!(
            found.groups,
            vec![group("BOX A", "IN", 1), group("BOX A", "OUT", 1), group("BOX B", "", 1)]
        );
        assert_eq!(found.total, 3);
    }

    #[test]
    fn matches_on_identifier() {
        let found = found(search(&inventory(), "1042"));
        assert_eq!(found.client_name, "ANA RUIZ");
        assert_eq!(found.client_id, "1042");
        assert_eq!(found.groups, vec![group("BOX A", "IN", 1), group("BOX B", "IN", 1)]);
        assert_eq!(found.total, 2);
    }

    #[test]
    fn exact_client_name_finds_its_records() {
        let table = inventory();
        for record in table.records().iter().filter(|record| record.client.is_some()) {
            let client = record.client.as_deref().unwrap();
            let found = found(search(&table, client));
            assert!(found.total >= 1);
            let kind = table.transaction_type(record);
            assert!(found
                .groups
                .iter()
                .any(|group| group.container == record.container && group.kind == kind));
        }
    }

    #[test]
    fn unknown_client_is_not_found() {
        assert_eq!(search(&inventory(), "nobody"), QueryResult::NotFound);
        assert_eq!(search(&NormalizedTable::default(), ""), QueryResult::NotFound);
    }

    #[test]
    fn query_is_not_a_pattern() {
        assert_eq!(search(&inventory(), "J.HN"), QueryResult::NotFound);
        assert_eq!(search(&inventory(), "SMITH|ANA"), QueryResult::NotFound);
    }

    #[test]
    fn empty_query_matches_records_with_a_client_or_id() {
        let table = inventory();
        let found = found(search(&table, "   "));
        let expected = table
            .records()
            .iter()
            .filter(|record| record.client.is_some() || record.id.is_some())
            .count();
        assert_eq!(found.total, expected);
        assert_eq!(found.total, 5);
    }

    #[test]
    fn total_is_sum_of_groups_and_match_count() {
        let table = inventory();
        for query in ["", "A", "SMITH", "X", "1", "RUIZ"] {
            let found = found(search(&table, query));
            let matches = table
                .records()
                .iter()
                .filter(|record| contains(&record.client, query) || contains(&record.id, query))
                .count();
            assert_eq!(found.total, found.groups.iter().map(|group| group.count).sum::<usize>());
            assert_eq!(found.total, matches);
        }
    }

    #[test]
    fn renders_plain_text() {
        let result = search(&inventory(), "1042");
        assert_eq!(
            result.to_string(),
            "Cliente: ANA RUIZ\nID: 1042\n\nCaja   TX  Cantidad\nBOX A  IN  1\nBOX B  IN  1\nTotal: 2"
        );
        assert_eq!(QueryResult::NotFound.to_string(), "Client not found.");
    }
}
