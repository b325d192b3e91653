//! End-to-end tests: request query string in, SQL and cache fragment out.

use querykit_filters::{
    ClauseTarget, Filter, FilterEngine, Operator, Placeholder, QueryParams, SelectBuilder,
    SqlValue, build_filter_conditions, dynamic_filters, extend_filters, order_validation,
};

fn hotel_catalog() -> Vec<Filter> {
    let country = vec![
        Filter::new("country", Operator::Eq, "country.name").with_field_id("1"),
        Filter::new("deleted_date", Operator::Eq, "country.deleted_date").with_field_id("2"),
    ];
    let booking = vec![
        Filter::new("stars", Operator::In, "booking.stars").with_field_id("3"),
        Filter::new("revenue", Operator::Ge, "SUM(booking.price)").with_field_id("4"),
        Filter::new("bookings", Operator::Gt, "count(booking.id)").with_field_id("5"),
    ];
    let search = vec![Filter::new("q", Operator::ILike, "hotel.name").with_field_id("6")];
    extend_filters([booking, country, search])
}

fn base_query() -> SelectBuilder {
    SelectBuilder::new(["country.name", "SUM(booking.price) AS revenue"])
        .from("booking")
        .join("JOIN country ON country.id = booking.country_id")
        .group_by("country.name")
}

fn text(s: &str) -> SqlValue {
    SqlValue::Text(s.to_string())
}

#[test]
fn test_catalog_merge_order() {
    let names: Vec<String> = hotel_catalog().into_iter().map(|f| f.name).collect();
    assert_eq!(
        names,
        ["q", "country", "deleted_date", "stars", "revenue", "bookings"]
    );
}

#[test]
fn test_country_stars_and_null_sentinel() {
    let params = QueryParams::parse_query(
        "country=Greece&stars=1&stars=2&deleted_date=__NULL__&unknown=1",
    );

    let (query, applied) = dynamic_filters(&hotel_catalog(), base_query(), &params);
    let built = query.build().unwrap();

    assert_eq!(
        built.sql,
        "SELECT country.name, SUM(booking.price) AS revenue FROM booking \
         JOIN country ON country.id = booking.country_id \
         WHERE country.name = ? AND country.deleted_date IS NULL AND booking.stars IN (?,?) \
         GROUP BY country.name"
    );
    assert_eq!(built.params, vec![text("Greece"), text("1"), text("2")]);
    assert_eq!(
        applied.to_key_fragment(),
        "booking.stars+IN=1%2C2&country.deleted_date=IS+NULL&country.name+%3D=Greece"
    );
}

#[test]
fn test_aggregates_go_to_having_with_pagination() {
    let params = QueryParams::parse_query("revenue=1000&BOOKINGS=3&q=grand&limit=25&offset=50");

    let (query, applied) = dynamic_filters(&hotel_catalog(), base_query(), &params);
    let built = query.build().unwrap();

    assert_eq!(
        built.sql,
        "SELECT country.name, SUM(booking.price) AS revenue FROM booking \
         JOIN country ON country.id = booking.country_id \
         WHERE hotel.name ILIKE ? \
         GROUP BY country.name \
         HAVING SUM(booking.price) >= ? AND count(booking.id) > ? \
         LIMIT ? OFFSET ?"
    );
    assert_eq!(
        built.params,
        vec![
            text("%grand%"),
            text("1000"),
            text("3"),
            SqlValue::Integer(25),
            SqlValue::Integer(50),
        ]
    );
    assert_eq!(applied.get("limit").as_deref(), Some("25"));
    assert_eq!(applied.get("offset").as_deref(), Some("50"));
}

#[test]
fn test_count_query_drops_pagination() {
    let params = QueryParams::parse_query("country=Greece&limit=10&offset=10");
    let (query, _) = dynamic_filters(&hotel_catalog(), base_query(), &params);

    let count = query.placeholder(Placeholder::Dollar).build_count().unwrap();
    assert_eq!(
        count.sql,
        "SELECT COUNT(*) AS total_rows FROM (SELECT country.name, SUM(booking.price) AS revenue \
         FROM booking JOIN country ON country.id = booking.country_id \
         WHERE country.name = $1 GROUP BY country.name) AS grouped_results"
    );
    assert_eq!(count.params, vec![text("Greece")]);
}

#[test]
fn test_lookalike_fields_are_not_aggregates() {
    let catalog = vec![
        Filter::new("max", Operator::Lt, "MAXvalue"),
        Filter::new("sum", Operator::Gt, "sum_prices"),
    ];
    let params = QueryParams::parse_query("max=5&sum=2");

    let conditionals = build_filter_conditions(&catalog, &params);
    assert_eq!(conditionals.len(), 2);
    assert!(conditionals.iter().all(|c| c.target == ClauseTarget::Where));
}

#[test]
fn test_values_are_never_spliced_into_sql() {
    let params = QueryParams::parse_query("country=%27%3B%20DROP%20TABLE%20country%3B--");
    let (query, _) = dynamic_filters(&hotel_catalog(), base_query(), &params);
    let built = query.build().unwrap();

    assert!(!built.sql.contains("DROP"));
    assert_eq!(built.params, vec![text("'; DROP TABLE country;--")]);
}

#[test]
fn test_order_by_resolves_against_merged_catalog() {
    let catalog = hotel_catalog();
    let order = order_validation("REVENUE", "desc", &catalog).unwrap();
    let fallback = order_validation("name", "", &catalog).unwrap();

    let built = base_query().order_by(&order).build().unwrap();
    assert!(built.sql.ends_with("ORDER BY SUM(booking.price) DESC"));
    assert_eq!(fallback.to_string(), "hotel.name ASC");
}

#[test]
fn test_engines_with_different_vocabularies_are_independent() {
    let catalog = vec![Filter::new("median", Operator::Gt, "median(booking.price)")];
    let params = QueryParams::parse_query("median=10");

    let tenant_a = FilterEngine::default();
    let tenant_b = FilterEngine::with_aggregate_functions(["median"]);

    let (a, _) = tenant_a.dynamic_filters(&catalog, base_query(), &params);
    let (b, _) = tenant_b.dynamic_filters(&catalog, base_query(), &params);
    assert_eq!(a.row_filters().len(), 1);
    assert_eq!(b.group_filters().len(), 1);
}
