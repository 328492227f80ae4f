//! Method and path of every Square Connect endpoint this client calls.
//!
//! `/v1/...` endpoints are scoped by the client's location id except for the
//! merchant-wide `/v1/me/...` family; `/v2/customers` is merchant-wide too.

use crate::http::HttpMethod;

const MERCHANT_ROUTE: &str = "/v1/me";
const ROLE_ROUTE: &str = "/v1/me/roles";
const CUSTOMER_ROUTE: &str = "/v2/customers";

/// One API operation, with the resource ids its path needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    MerchantProfile,
    ListLocations,

    ListRoles,
    GetRole(&'a str),
    CreateRole,
    UpdateRole(&'a str),

    ListEmployees,
    GetEmployee(&'a str),
    CreateEmployee,
    UpdateEmployee(&'a str),

    ListItems,
    CreateItem,
    GetItem(&'a str),
    UpdateItem(&'a str),
    DeleteItem(&'a str),
    UploadItemImage(&'a str),

    ListInventory,
    AdjustInventory(&'a str),

    ListCategories,
    CreateCategory,
    UpdateCategory(&'a str),
    DeleteCategory(&'a str),

    CreateVariation { item_id: &'a str },
    UpdateVariation { item_id: &'a str, variation_id: &'a str },
    DeleteVariation { item_id: &'a str, variation_id: &'a str },

    ListCustomers,
    GetCustomer(&'a str),
    CreateCustomer,
    UpdateCustomer(&'a str),
    DeleteCustomer(&'a str),

    ListBankAccounts,
    GetBankAccount(&'a str),

    ListTransactions,
    GetTransaction(&'a str),
    VoidTransaction(&'a str),
    ChargeTransaction,
    CaptureTransaction(&'a str),

    ListPayments,
    GetPayment(&'a str),
}

impl Endpoint<'_> {
    pub fn method(&self) -> HttpMethod {
        use Endpoint::*;
        match self {
            CreateRole | CreateEmployee | CreateItem | UploadItemImage(_) | AdjustInventory(_)
            | CreateCategory | CreateVariation { .. } | CreateCustomer | VoidTransaction(_)
            | ChargeTransaction | CaptureTransaction(_) => HttpMethod::Post,

            UpdateRole(_) | UpdateEmployee(_) | UpdateItem(_) | UpdateCategory(_)
            | UpdateVariation { .. } | UpdateCustomer(_) => HttpMethod::Put,

            DeleteItem(_) | DeleteCategory(_) | DeleteVariation { .. } | DeleteCustomer(_) => {
                HttpMethod::Delete
            }

            _ => HttpMethod::Get,
        }
    }

    /// Path relative to the API host, with ids filled in.
    pub fn path(&self, location_id: &str) -> String {
        use Endpoint::*;
        let v1 = format!("/v1/{location_id}");
        let v2 = format!("/v2/locations/{location_id}");
        match *self {
            MerchantProfile => MERCHANT_ROUTE.to_string(),
            ListLocations => format!("{MERCHANT_ROUTE}/locations"),

            ListRoles | CreateRole => ROLE_ROUTE.to_string(),
            GetRole(role_id) | UpdateRole(role_id) => format!("{ROLE_ROUTE}/{role_id}"),

            ListEmployees | CreateEmployee => format!("{MERCHANT_ROUTE}/employees"),
            GetEmployee(employee_id) | UpdateEmployee(employee_id) => {
                format!("{MERCHANT_ROUTE}/employees/{employee_id}")
            }

            ListItems | CreateItem => format!("{v1}/items"),
            GetItem(item_id) | UpdateItem(item_id) | DeleteItem(item_id) => format!("{v1}/items/{item_id}"),
            UploadItemImage(item_id) => format!("{v1}/items/{item_id}/image"),

            ListInventory => format!("{v1}/inventory"),
            AdjustInventory(variation_id) => format!("{v1}/inventory/{variation_id}"),

            ListCategories | CreateCategory => format!("{v1}/categories"),
            UpdateCategory(category_id) | DeleteCategory(category_id) => {
                format!("{v1}/categories/{category_id}")
            }

            CreateVariation { item_id } => format!("{v1}/items/{item_id}/variations"),
            UpdateVariation { item_id, variation_id } | DeleteVariation { item_id, variation_id } => {
                format!("{v1}/items/{item_id}/variations/{variation_id}")
            }

            ListCustomers | CreateCustomer => CUSTOMER_ROUTE.to_string(),
            GetCustomer(customer_id) | UpdateCustomer(customer_id) | DeleteCustomer(customer_id) => {
                format!("{CUSTOMER_ROUTE}/{customer_id}")
            }

            ListBankAccounts => format!("{v1}/bank-accounts"),
            GetBankAccount(bank_account_id) => format!("{v1}/bank-accounts/{bank_account_id}"),

            ListTransactions | ChargeTransaction => format!("{v2}/transactions"),
            GetTransaction(transaction_id) => format!("{v2}/transactions/{transaction_id}"),
            VoidTransaction(transaction_id) => format!("{v2}/transactions/{transaction_id}/void"),
            CaptureTransaction(transaction_id) => format!("{v2}/transactions/{transaction_id}/capture"),

            ListPayments => format!("{v1}/payments"),
            GetPayment(payment_id) => format!("{v1}/payments/{payment_id}"),
        }
    }
}
