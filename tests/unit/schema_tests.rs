//! Schema snapshot loading and validation tests

use pretty_assertions::assert_eq;

use rust_apiscaffold::model::{parse_schema_str, SchemaObject};
use rust_apiscaffold::project::build_features;

#[test]
fn test_parse_tables_views_and_constraints() {
    let database = parse_schema_str(
        r#"<Database Name="Store">
            <Table Name="Product">
                <Column Name="ProductID" Type="int" />
                <Column Name="ProductName" Type="nvarchar" Length="100" />
                <Column Name="Price" Type="decimal" Precision="8" Scale="4" Nullable="true" />
                <PrimaryKey Columns="[ProductID]" />
                <Identity Column="ProductID" Seed="100" />
                <Unique Name="UQ_Product_ProductName" Columns="ProductName" />
            </Table>
            <View Schema="Sales" Name="Totals">
                <Column Name="Total" Type="money" />
            </View>
        </Database>"#,
    )
    .unwrap();

    let product = database.find_table("dbo.Product").unwrap();
    assert_eq!(product.key_columns(), ["ProductID".to_string()]);
    assert_eq!(product.identity.as_ref().unwrap().seed, 100);
    assert_eq!(product.uniques[0].columns, vec!["ProductName".to_string()]);

    let price = product.column("Price").unwrap();
    assert!(price.is_nullable);
    assert_eq!((price.precision, price.scale), (Some(8), Some(4)));

    let totals = database.find_view("Sales", "Totals").unwrap();
    assert_eq!(totals.full_name(), "Sales.Totals");
}

#[test]
fn test_unqualified_foreign_key_uses_default_schema() {
    let database = parse_schema_str(
        r#"<Database Name="Store" DefaultSchema="Sales">
            <Table Name="Customer">
                <Column Name="CustomerID" Type="int" />
                <PrimaryKey Columns="CustomerID" />
            </Table>
            <Table Name="Order">
                <Column Name="OrderID" Type="int" />
                <Column Name="CustomerID" Type="int" />
                <ForeignKey Name="FK_Order_Customer" Columns="CustomerID" References="Customer" />
            </Table>
        </Database>"#,
    )
    .unwrap();

    let order = database.find_table("Sales.Order").unwrap();
    assert_eq!(order.foreign_keys[0].references, "Sales.Customer");
}

#[test]
fn test_missing_foreign_key_target_is_rejected() {
    let err = parse_schema_str(
        r#"<Database Name="Store">
            <Table Name="Order">
                <Column Name="CustomerID" Type="int" />
                <ForeignKey Name="FK_Order_Customer" Columns="CustomerID" References="dbo.Customer" />
            </Table>
        </Database>"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("dbo.Customer"), "{}", err);
}

#[test]
fn test_primary_key_column_must_exist() {
    let err = parse_schema_str(
        r#"<Database Name="Store">
            <Table Name="Order">
                <Column Name="OrderID" Type="int" />
                <PrimaryKey Columns="Id" />
            </Table>
        </Database>"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("'Id'"), "{}", err);
}

#[test]
fn test_wrong_root_element() {
    let err = parse_schema_str("<Schema />").unwrap_err();
    assert!(err.to_string().contains("<Database>"), "{}", err);
}

#[test]
fn test_features_group_by_schema_in_first_appearance_order() {
    let database = parse_schema_str(
        r#"<Database Name="Store">
            <Table Schema="Sales" Name="Order"><Column Name="Id" Type="int" /></Table>
            <Table Schema="dbo" Name="Product"><Column Name="Id" Type="int" /></Table>
            <Table Schema="Sales" Name="Customer"><Column Name="Id" Type="int" /></Table>
            <View Schema="dbo" Name="Catalog"><Column Name="Id" Type="int" /></View>
        </Database>"#,
    )
    .unwrap();

    let features: Vec<(String, Vec<String>)> = build_features(&database)
        .into_iter()
        .map(|f| {
            let objects = f.db_objects.iter().map(|o| o.full_name()).collect();
            (f.name, objects)
        })
        .collect();
    assert_eq!(
        features,
        vec![
            (
                "Sales".to_string(),
                vec!["Sales.Order".to_string(), "Sales.Customer".to_string()]
            ),
            (
                "dbo".to_string(),
                vec!["dbo.Product".to_string(), "dbo.Catalog".to_string()]
            ),
        ]
    );
}
