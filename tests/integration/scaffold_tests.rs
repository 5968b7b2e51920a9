//! End-to-end scaffolding tests against fixture projects

use std::fs;

use pretty_assertions::assert_eq;

use crate::common::{position, TestContext};

#[test]
fn test_store_project_generates_every_layer() {
    let ctx = TestContext::with_fixture("store");
    let report = ctx.scaffold_successfully();

    assert_eq!(report.output_directory, ctx.output_dir());
    assert_eq!(report.written().count(), report.files.len());

    let expected = vec![
        "Controllers/DboController.cs",
        "Controllers/SalesController.cs",
        "Models/Category.cs",
        "Models/Order.cs",
        "Models/OrderDetail.cs",
        "Models/OrderSummary.cs",
        "Models/Product.cs",
        "Models/StoreDbContext.cs",
        "Repositories/DboRepository.cs",
        "Repositories/IDboRepository.cs",
        "Repositories/ISalesRepository.cs",
        "Repositories/SalesRepository.cs",
        "Requests/CategoryRequest.cs",
        "Requests/OrderDetailRequest.cs",
        "Requests/OrderRequest.cs",
        "Requests/ProductRequest.cs",
        "Requests/RequestExtensions.cs",
        "Responses/IListResponse.cs",
        "Responses/IPagedResponse.cs",
        "Responses/IResponse.cs",
        "Responses/ISingleResponse.cs",
        "Responses/ListResponse.cs",
        "Responses/PagedResponse.cs",
        "Responses/Response.cs",
        "Responses/ResponseExtensions.cs",
        "Responses/SingleResponse.cs",
    ];
    assert_eq!(ctx.generated_files(), expected);
}

#[test]
fn test_report_follows_layer_order() {
    let ctx = TestContext::with_fixture("store");
    let report = ctx.scaffold_successfully();

    let first_of = |directory: &str| {
        report
            .files
            .iter()
            .position(|f| f.path.starts_with(directory))
            .unwrap()
    };
    assert!(first_of("Models") < first_of("Repositories"));
    assert!(first_of("Repositories") < first_of("Responses"));
    assert!(first_of("Responses") < first_of("Requests"));
    assert!(first_of("Requests") < first_of("Controllers"));
}

#[test]
fn test_product_controller_endpoints() {
    let ctx = TestContext::with_fixture("store");
    ctx.scaffold_successfully();
    let controller = ctx.generated("Controllers/DboController.cs");

    assert!(controller.contains("namespace Store.Controllers\n{"));
    assert!(controller.contains("    [ApiController]\n    [Route(\"api/[controller]\")]\n"));
    assert!(controller.contains("    public class DboController : ControllerBase\n"));
    assert!(controller.contains(
        "public DboController(IDboRepository repository, ILogger<DboController> logger)"
    ));

    let endpoints = [
        "[HttpGet(\"Product\")]\n        public async Task<IActionResult> GetProductsAsync(int pageSize = 10, int pageNumber = 1, int? categoryID = null)",
        "[HttpGet(\"Product/{id}\")]\n        public async Task<IActionResult> GetProductAsync(int id)",
        "[HttpPost(\"Product\")]\n        public async Task<IActionResult> PostProductAsync([FromBody] ProductRequest request)",
        "[HttpPut(\"Product/{id}\")]\n        public async Task<IActionResult> PutProductAsync(int id, [FromBody] ProductRequest request)",
        "[HttpDelete(\"Product/{id}\")]\n        public async Task<IActionResult> DeleteProductAsync(int id)",
    ];
    let mut previous = 0;
    for endpoint in endpoints {
        let at = position(&controller, endpoint);
        assert!(at > previous, "endpoint out of order: {}", endpoint);
        previous = at;
    }
}

#[test]
fn test_product_request_model() {
    let ctx = TestContext::with_fixture("store");
    ctx.scaffold_successfully();
    let request = ctx.generated("Requests/ProductRequest.cs");

    assert!(!request.contains("ProductID"));
    assert!(request.contains(
        "        [Required]\n        [StringLength(100)]\n        public string ProductName { get; set; }\n"
    ));
    assert!(request.contains("        public int? CategoryID { get; set; }\n"));
    assert!(request.contains("        [Required]\n        public decimal UnitPrice { get; set; }\n"));

    let extensions = ctx.generated("Requests/RequestExtensions.cs");
    assert!(extensions
        .contains("public static Product ToEntity(this ProductRequest request)"));
    assert!(extensions.contains("                ProductName = request.ProductName,\n"));
    assert!(extensions.contains("                UnitPrice = request.UnitPrice\n            };"));
}

#[test]
fn test_removed_action_and_view_endpoints() {
    let ctx = TestContext::with_fixture("store");
    ctx.scaffold_successfully();
    let controller = ctx.generated("Controllers/SalesController.cs");

    assert!(controller.contains("PutOrderDetailAsync(string id, [FromBody] OrderDetailRequest request)"));
    assert!(!controller.contains("DeleteOrderDetailAsync"));
    assert!(controller.contains("DeleteOrderAsync(long id)"));
    assert!(controller.contains("GetOrderSummariesAsync(int pageSize = 10, int pageNumber = 1)"));
    assert!(!controller.contains("PostOrderSummaryAsync"));
}

#[test]
fn test_second_run_skips_existing_files() {
    let ctx = TestContext::with_fixture("store");
    let first = ctx.scaffold_successfully();
    let product = ctx.output_dir().join("Models/Product.cs");
    fs::write(&product, "// edited by hand").unwrap();

    let second = ctx.scaffold_successfully();

    assert_eq!(second.skipped().count(), first.files.len());
    assert_eq!(second.written().count(), 0);
    assert_eq!(fs::read_to_string(&product).unwrap(), "// edited by hand");
}

#[test]
fn test_force_rewrites_only_changed_files() {
    let ctx = TestContext::with_fixture("store");
    let first = ctx.scaffold_successfully();
    let product = ctx.output_dir().join("Models/Product.cs");
    let original = fs::read_to_string(&product).unwrap();
    fs::write(&product, "// edited by hand").unwrap();

    let forced = ctx.scaffold(true).unwrap();

    let written: Vec<String> = forced
        .written()
        .map(|f| f.path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(written, vec!["Models/Product.cs".to_string()]);
    assert_eq!(forced.unchanged().count(), first.files.len() - 1);
    assert_eq!(fs::read_to_string(&product).unwrap(), original);
}

#[test]
fn test_checksums_are_stable_across_runs() {
    let first = TestContext::with_fixture("store").scaffold_successfully();
    let second = TestContext::with_fixture("store").scaffold_successfully();

    let checksums = |report: &rust_apiscaffold::ScaffoldReport| -> Vec<String> {
        report.files.iter().map(|f| f.checksum.clone()).collect()
    };
    assert_eq!(checksums(&first), checksums(&second));
}

#[test]
fn test_output_override() {
    let ctx = TestContext::with_fixture("store");
    let output = ctx.project_dir.join("api");

    let report = rust_apiscaffold::scaffold_project(rust_apiscaffold::ScaffoldOptions {
        project_path: ctx.project_path(),
        output_path: Some(output.clone()),
        force: false,
    })
    .unwrap();

    assert_eq!(report.output_directory, output);
    assert!(output.join("Models/StoreDbContext.cs").exists());
    assert!(!ctx.output_dir().exists());
}

#[test]
fn test_audited_project_with_data_contracts() {
    let ctx = TestContext::with_fixture("audited");
    ctx.scaffold_successfully();

    let request = ctx.generated("Requests/EmployeeRequest.cs");
    assert!(!request.contains("Timestamp"));
    assert!(!request.contains("EmployeeID"));
    assert!(request.contains("public string FirstName { get; set; }"));

    let controller = ctx.generated("Controllers/DboController.cs");
    assert!(controller.contains("entity.FirstName = request.FirstName;"));
    assert!(controller.contains("entity.LastName = request.LastName;"));
    assert!(!controller.contains("entity.CreationUser = request.CreationUser;"));
    assert!(!controller.contains("entity.Timestamp"));
    assert!(controller.contains("new PagedResponse<EmployeeDataContract>()"));

    assert!(ctx.output_dir().join("Models/EmployeeDataContract.cs").exists());
    let db_context = ctx.generated("Models/HrDbContext.cs");
    assert!(db_context.contains("IsRowVersion()"));
}

#[test]
fn test_missing_project_file_reports_path() {
    let ctx = TestContext::empty();
    let err = ctx.scaffold(false).unwrap_err();
    assert!(err.to_string().contains("project.scaffold.xml"), "{}", err);
}
