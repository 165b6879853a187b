use crate::{constants::COUNTRY, order::Order};

/// Abbreviation (lower case, with its dot) to full form.
const ABBREVIATIONS: &[(&str, &str)] = &[
    // street types
    ("r.", "Rua"),
    ("av.", "Avenida"),
    ("al.", "Alameda"),
    ("tv.", "Travessa"),
    ("trav.", "Travessa"),
    ("rod.", "Rodovia"),
    ("estr.", "Estrada"),
    ("pç.", "Praça"),
    ("pça.", "Praça"),
    ("pc.", "Praça"),
    ("lgo.", "Largo"),
    ("vl.", "Vila"),
    ("jd.", "Jardim"),
    ("pq.", "Parque"),
    ("res.", "Residencial"),
    ("serv.", "Servidão"),
    // titles
    ("dr.", "Doutor"),
    ("dra.", "Doutora"),
    ("prof.", "Professor"),
    ("profa.", "Professora"),
    ("pe.", "Padre"),
    ("sto.", "Santo"),
    ("sta.", "Santa"),
    ("gov.", "Governador"),
    ("pres.", "Presidente"),
    ("cel.", "Coronel"),
    ("gen.", "General"),
    ("mal.", "Marechal"),
    ("cap.", "Capitão"),
    ("ten.", "Tenente"),
    ("sen.", "Senador"),
    ("dep.", "Deputado"),
    ("ver.", "Vereador"),
    ("eng.", "Engenheiro"),
    ("des.", "Desembargador"),
];

/// Expands known street-type and title abbreviations and collapses runs of
/// whitespace. Anything not in the table passes through unchanged.
pub fn normalize_address(raw: &str) -> String {
    raw.split_whitespace()
        .map(expand_token)
        .collect::<Vec<_>>()
        .join(" ")
}

fn expand_token(token: &str) -> &str {
    let lower = token.to_lowercase();
    ABBREVIATIONS
        .iter()
        .find(|(abbr, _)| *abbr == lower)
        .map_or(token, |&(_, full)| full)
}

/// `street, number, neighborhood, municipality, Brasil` with empty parts
/// left out.
pub fn build_address_query(order: &Order) -> String {
    join_parts([
        order.street.as_deref().map(normalize_address),
        order.number.as_deref().map(|n| n.trim().to_string()),
        order.neighborhood.as_deref().map(normalize_address),
        order.municipality.as_deref().map(normalize_address),
        Some(COUNTRY.to_string()),
    ])
}

/// Less specific queries for when the primary one finds nothing: first
/// without the street number, then only neighborhood, municipality and
/// `region`. Duplicates of earlier queries are dropped.
pub fn build_alternative_queries(order: &Order, region: &str) -> Vec<String> {
    let neighborhood = order.neighborhood.as_deref().map(normalize_address);
    let municipality = order.municipality.as_deref().map(normalize_address);

    let mut candidates = vec![join_parts([
        order.street.as_deref().map(normalize_address),
        neighborhood.clone(),
        municipality.clone(),
        Some(COUNTRY.to_string()),
    ])];

    if has_text(&neighborhood) || has_text(&municipality) {
        candidates.push(join_parts([
            neighborhood,
            municipality,
            Some(normalize_address(region)),
            Some(COUNTRY.to_string()),
        ]));
    }

    let mut seen = vec![build_address_query(order)];
    let mut alternatives = Vec::with_capacity(candidates.len());
    for query in candidates {
        if !seen.contains(&query) {
            seen.push(query.clone());
            alternatives.push(query);
        }
    }
    alternatives
}

fn has_text(part: &Option<String>) -> bool {
    part.as_deref().is_some_and(|s| !s.trim().is_empty())
}

fn join_parts<const N: usize>(parts: [Option<String>; N]) -> String {
    parts
        .into_iter()
        .flatten()
        .filter(|part| !part.trim().is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{build_address_query, build_alternative_queries, normalize_address};
    use crate::order::Order;

    fn flores() -> Order {
        Order::new("os-1").with_address("R. das Flores", "123", "Centro", "Itajaí")
    }

    #[test]
    fn expands_street_types_and_titles() {
        assert_eq!(normalize_address("R. das Flores"), "Rua das Flores");
        assert_eq!(
            normalize_address("AV.  Gov.   Adolfo Konder"),
            "Avenida Governador Adolfo Konder"
        );
        assert_eq!(normalize_address("Pça. Sta. Catarina"), "Praça Santa Catarina");
    }

    #[test]
    fn unknown_tokens_pass_through() {
        assert_eq!(normalize_address("Rua XV de Novembro"), "Rua XV de Novembro");
        assert_eq!(normalize_address("Estrada Geral s/n"), "Estrada Geral s/n");
        assert_eq!(normalize_address("R"), "R");
    }

    #[test]
    fn collapses_whitespace() {
        assert_eq!(normalize_address("  Rua\tA \n B  "), "Rua A B");
        assert_eq!(normalize_address("   "), "");
    }

    #[test]
    fn builds_full_query_with_country() {
        assert_eq!(
            build_address_query(&flores()),
            "Rua das Flores, 123, Centro, Itajaí, Brasil"
        );
    }

    #[test]
    fn omits_empty_components() {
        let order = Order::new("os-2").with_address("Av. Brasil", "", "  ", "Balneário Camboriú");
        assert_eq!(
            build_address_query(&order),
            "Avenida Brasil, Balneário Camboriú, Brasil"
        );
        assert_eq!(build_address_query(&Order::new("bare")), "Brasil");
    }

    #[test]
    fn alternatives_drop_number_then_street() {
        assert_eq!(
            build_alternative_queries(&flores(), "Santa Catarina"),
            vec![
                "Rua das Flores, Centro, Itajaí, Brasil".to_string(),
                "Centro, Itajaí, Santa Catarina, Brasil".to_string(),
            ]
        );
    }

    #[test]
    fn alternatives_skip_duplicates_and_empty_localities() {
        let no_number = Order::new("a").with_address("R. A", "", "Centro", "Itajaí");
        assert_eq!(
            build_alternative_queries(&no_number, "Santa Catarina"),
            vec!["Centro, Itajaí, Santa Catarina, Brasil".to_string()]
        );

        let street_only = Order::new("b").with_address("R. A", "10", "", "");
        assert_eq!(
            build_alternative_queries(&street_only, "Santa Catarina"),
            vec!["Rua A, Brasil".to_string()]
        );
    }
}
