//! Square Connect client: one method per API operation.
//!
//! # Design
//! `SquareClient` holds an immutable `ClientConfig` and a `Transport`. Each
//! operation resolves an `Endpoint`, builds the request with
//! `RequestBuilder`, hands it to the transport once and lets
//! `ResponseHandler` produce the single `SquareResult` the caller sees.
//! `build` and `execute` are public so callers can run the I/O themselves.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::endpoints::Endpoint;
use crate::error::SquareResult;
use crate::http::{HttpRequest, HttpResponse};
use crate::receipt;
use crate::request::RequestBuilder;
use crate::response::ResponseHandler;
use crate::transport::{Transport, TransportError};
use crate::types::{QueryParams, ReceiptInfo};

#[derive(Clone)]
pub struct SquareClient<T> {
    config: ClientConfig,
    transport: T,
}

#[cfg(feature = "ureq")]
impl SquareClient<crate::transport::UreqTransport> {
    /// Client over a default blocking `ureq` transport.
    pub fn with_default_transport(config: ClientConfig) -> Self {
        Self::new(config, crate::transport::UreqTransport::new())
    }
}

impl<T: Transport> SquareClient<T> {
    pub fn new(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn request_builder(&self) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config)
    }

    pub fn response_handler(&self) -> ResponseHandler {
        ResponseHandler::from(&self.config)
    }

    /// Request for `endpoint` without a body.
    pub fn build(&self, endpoint: Endpoint<'_>, query: Option<&QueryParams>) -> HttpRequest {
        self.request_builder()
            .build(Some(endpoint.method()), &endpoint.path(self.config.location_id()), query)
    }

    /// Request for `endpoint` carrying `body` as JSON.
    pub fn build_with_body<B: Serialize + ?Sized>(&self, endpoint: Endpoint<'_>, body: &B) -> SquareResult<HttpRequest> {
        self.request_builder()
            .build_json(endpoint.method(), &endpoint.path(self.config.location_id()), body)
    }

    /// Send a prepared request and decode its JSON answer.
    pub fn execute<R: DeserializeOwned>(&self, request: HttpRequest) -> SquareResult<R> {
        self.response_handler().handle(self.dispatch(&request))
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.transport.send(request)
    }

    fn call(&self, endpoint: Endpoint<'_>) -> SquareResult<Value> {
        self.execute(self.build(endpoint, None))
    }

    fn call_with_body<B: Serialize + ?Sized>(&self, endpoint: Endpoint<'_>, body: &B) -> SquareResult<Value> {
        self.execute(self.build_with_body(endpoint, body)?)
    }

    // -------------------------------------------------------------------------
    // Merchant
    // -------------------------------------------------------------------------

    /// Merchant owning the access token.
    pub fn get_merchant_profile(&self) -> SquareResult<Value> {
        self.call(Endpoint::MerchantProfile)
    }

    pub fn list_locations(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListLocations)
    }

    // -------------------------------------------------------------------------
    // Roles
    // -------------------------------------------------------------------------

    pub fn list_roles(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListRoles)
    }

    pub fn get_role(&self, role_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetRole(role_id))
    }

    pub fn create_role<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateRole, data)
    }

    pub fn update_role<B: Serialize + ?Sized>(&self, role_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateRole(role_id), data)
    }

    // -------------------------------------------------------------------------
    // Employees
    // -------------------------------------------------------------------------

    pub fn list_employees(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListEmployees)
    }

    pub fn get_employee(&self, employee_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetEmployee(employee_id))
    }

    pub fn create_employee<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateEmployee, data)
    }

    pub fn update_employee<B: Serialize + ?Sized>(&self, employee_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateEmployee(employee_id), data)
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    pub fn list_items(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListItems)
    }

    pub fn create_item<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateItem, data)
    }

    pub fn get_item(&self, item_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetItem(item_id))
    }

    pub fn update_item<B: Serialize + ?Sized>(&self, item_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateItem(item_id), data)
    }

    pub fn delete_item(&self, item_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::DeleteItem(item_id))
    }

    /// Download `image_url` and upload it as the item's image.
    ///
    /// Two requests in sequence; the first failure ends the operation. On
    /// success the API's answer is returned as unparsed text.
    pub fn upload_item_image(&self, item_id: &str, image_url: &str, image_extension: &str) -> SquareResult<String> {
        let builder = self.request_builder();
        let handler = self.response_handler();

        let image = handler.handle_bytes(self.dispatch(&builder.image_fetch(image_url)))?;

        let path = Endpoint::UploadItemImage(item_id).path(self.config.location_id());
        let upload = builder.image_upload(&path, image_url, image_extension, image);
        handler.handle_raw(self.dispatch(&upload))
    }

    // -------------------------------------------------------------------------
    // Inventory
    // -------------------------------------------------------------------------

    pub fn list_inventory(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListInventory)
    }

    pub fn adjust_inventory<B: Serialize + ?Sized>(&self, variation_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::AdjustInventory(variation_id), data)
    }

    // -------------------------------------------------------------------------
    // Categories
    // -------------------------------------------------------------------------

    pub fn list_categories(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListCategories)
    }

    pub fn create_category<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateCategory, data)
    }

    pub fn update_category<B: Serialize + ?Sized>(&self, category_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateCategory(category_id), data)
    }

    pub fn delete_category(&self, category_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::DeleteCategory(category_id))
    }

    // -------------------------------------------------------------------------
    // Variations
    // -------------------------------------------------------------------------

    pub fn create_variation<B: Serialize + ?Sized>(&self, item_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateVariation { item_id }, data)
    }

    pub fn update_variation<B: Serialize + ?Sized>(
        &self,
        item_id: &str,
        variation_id: &str,
        data: &B,
    ) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateVariation { item_id, variation_id }, data)
    }

    pub fn delete_variation(&self, item_id: &str, variation_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::DeleteVariation { item_id, variation_id })
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    pub fn list_customers(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListCustomers)
    }

    pub fn get_customer(&self, customer_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetCustomer(customer_id))
    }

    pub fn create_customer<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::CreateCustomer, data)
    }

    pub fn update_customer<B: Serialize + ?Sized>(&self, customer_id: &str, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::UpdateCustomer(customer_id), data)
    }

    pub fn delete_customer(&self, customer_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::DeleteCustomer(customer_id))
    }

    // -------------------------------------------------------------------------
    // Bank accounts
    // -------------------------------------------------------------------------

    pub fn list_bank_accounts(&self) -> SquareResult<Value> {
        self.call(Endpoint::ListBankAccounts)
    }

    pub fn get_bank_account(&self, bank_account_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetBankAccount(bank_account_id))
    }

    // -------------------------------------------------------------------------
    // Transactions
    // -------------------------------------------------------------------------

    /// Transactions for the location. Yields the response's `transactions`
    /// field, or `null` when the API leaves it out.
    pub fn list_transactions(&self, params: Option<&QueryParams>) -> SquareResult<Value> {
        let result: Value = self.execute(self.build(Endpoint::ListTransactions, params))?;
        Ok(match result {
            Value::Object(mut fields) => fields.remove("transactions").unwrap_or(Value::Null),
            _ => Value::Null,
        })
    }

    pub fn get_transaction(&self, transaction_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetTransaction(transaction_id))
    }

    pub fn void_transaction(&self, transaction_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::VoidTransaction(transaction_id))
    }

    pub fn charge_transaction<B: Serialize + ?Sized>(&self, data: &B) -> SquareResult<Value> {
        self.call_with_body(Endpoint::ChargeTransaction, data)
    }

    pub fn capture_transaction(&self, transaction_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::CaptureTransaction(transaction_id))
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    pub fn list_payments(&self, params: Option<&QueryParams>) -> SquareResult<Value> {
        self.execute(self.build(Endpoint::ListPayments, params))
    }

    pub fn get_payment(&self, payment_id: &str) -> SquareResult<Value> {
        self.call(Endpoint::GetPayment(payment_id))
    }

    /// Scrape the AID and cardholder name from a card payment's receipt page.
    ///
    /// Only a transport failure is an error. Whatever page comes back, on any
    /// status, is scraped as is.
    pub fn get_customer_info_from_receipt(&self, receipt_url: &str) -> SquareResult<ReceiptInfo> {
        let request = self.request_builder().receipt(receipt_url);
        let response = self.dispatch(&request)?;
        Ok(receipt::extract(&response.text()))
    }
}

impl<T> fmt::Debug for SquareClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SquareClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
