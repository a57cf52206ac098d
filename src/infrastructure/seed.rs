//! Startup fixtures. Every record the services know about at boot lives
//! here; payments, ledger entries, and emails only appear at runtime.

use crate::application::accounting::Accounting;
use crate::application::directory::CustomerDirectory;
use crate::application::notifier::Notifier;
use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::email::EmailTemplate;
use crate::domain::invoice::{
    Invoice, InvoiceStatus, LineItem, PurchaseOrder, PurchaseOrderStatus,
};
use crate::domain::ports::{
    CustomerRepository, InvoiceRepository, PurchaseOrderRepository, TemplateRepository,
};
use crate::error::Result;
use crate::infrastructure::in_memory::{
    InMemoryCustomers, InMemoryInvoices, InMemoryLedger, InMemoryOutbox, InMemoryPayments,
    InMemoryPurchaseOrders, InMemoryRules, InMemoryTemplates,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid fixture date")
}

/// A directory service preloaded with the fixture customers.
pub async fn seeded_directory() -> Result<CustomerDirectory> {
    let store = InMemoryCustomers::new();
    for customer in customers() {
        store.store(customer).await?;
    }
    Ok(CustomerDirectory::new(
        Box::new(store),
        Box::new(InMemoryLedger::new()),
    ))
}

/// An accounting service preloaded with the fixture invoices and orders.
pub async fn seeded_accounting() -> Result<Accounting> {
    let invoice_store = InMemoryInvoices::new();
    for invoice in invoices() {
        invoice_store.store(invoice).await?;
    }
    let order_store = InMemoryPurchaseOrders::new();
    for order in purchase_orders() {
        order_store.store(order).await?;
    }
    Ok(Accounting::new(
        Box::new(invoice_store),
        Box::new(order_store),
        Box::new(InMemoryPayments::new()),
    ))
}

/// A notifier preloaded with the built-in templates.
pub async fn seeded_notifier() -> Result<Notifier> {
    let template_store = InMemoryTemplates::new();
    for template in templates() {
        template_store.store(template).await?;
    }
    Ok(Notifier::new(
        Box::new(InMemoryOutbox::new()),
        Box::new(template_store),
        Box::new(InMemoryRules::new()),
    ))
}

pub fn customers() -> Vec<Customer> {
    vec![
        Customer {
            id: "cust_001".to_string(),
            name: "Acme Corporation".to_string(),
            email: "contact@acme.com".to_string(),
            phone: "+1-555-0123".to_string(),
            account_number: "ACC-789123456".to_string(),
            status: CustomerStatus::Active,
            credit_limit: dec!(50000.00),
            current_balance: dec!(12500.00),
            created_date: date(2024, 1, 15),
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
        },
        Customer {
            id: "cust_002".to_string(),
            name: "Tech Solutions Ltd".to_string(),
            email: "billing@techsolutions.com".to_string(),
            phone: "+1-555-0456".to_string(),
            account_number: "ACC-456789123".to_string(),
            status: CustomerStatus::Active,
            credit_limit: dec!(25000.00),
            current_balance: dec!(8750.00),
            created_date: date(2024, 2, 20),
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
        },
        Customer {
            id: "cust_003".to_string(),
            name: "Global Manufacturing Inc".to_string(),
            email: "accounts@globalmanuf.com".to_string(),
            phone: "+1-555-0789".to_string(),
            account_number: "ACC-123456789".to_string(),
            status: CustomerStatus::Suspended,
            credit_limit: dec!(75000.00),
            current_balance: dec!(45000.00),
            created_date: date(2023, 11, 10),
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
        },
    ]
}

pub fn invoices() -> Vec<Invoice> {
    vec![
        Invoice {
            id: "INV-2025-001".to_string(),
            customer_account: "ACC-789123456".to_string(),
            amount: dec!(12500.00),
            status: InvoiceStatus::Pending,
            due_date: date(2025, 7, 15),
            issue_date: date(2025, 6, 1),
            description: "Software licensing - Q2 2025".to_string(),
            payment_terms: "NET30".to_string(),
            paid_amount: Decimal::ZERO,
            paid_date: None,
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
            line_items: vec![LineItem {
                product: "Enterprise License".to_string(),
                quantity: 5,
                unit_price: dec!(2500.00),
            }],
        },
        Invoice {
            id: "INV-2025-002".to_string(),
            customer_account: "ACC-456789123".to_string(),
            amount: dec!(8750.00),
            status: InvoiceStatus::Overdue,
            due_date: date(2025, 5, 30),
            issue_date: date(2025, 5, 1),
            description: "Consulting services - May 2025".to_string(),
            payment_terms: "NET30".to_string(),
            paid_amount: Decimal::ZERO,
            paid_date: None,
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
            line_items: vec![LineItem {
                product: "Consulting Hours".to_string(),
                quantity: 35,
                unit_price: dec!(250.00),
            }],
        },
        Invoice {
            id: "INV-2025-003".to_string(),
            customer_account: "ACC-123456789".to_string(),
            amount: dec!(45000.00),
            status: InvoiceStatus::Pending,
            due_date: date(2025, 6, 30),
            issue_date: date(2025, 6, 1),
            description: "Hardware procurement".to_string(),
            payment_terms: "NET30".to_string(),
            paid_amount: Decimal::ZERO,
            paid_date: None,
            last_payment_date: None,
            last_payment_amount: Decimal::ZERO,
            line_items: vec![LineItem {
                product: "Server Equipment".to_string(),
                quantity: 3,
                unit_price: dec!(15000.00),
            }],
        },
    ]
}

pub fn purchase_orders() -> Vec<PurchaseOrder> {
    vec![
        PurchaseOrder {
            id: "PO-2025-101".to_string(),
            supplier: "Tech Components Inc".to_string(),
            amount: dec!(25000.00),
            status: PurchaseOrderStatus::Approved,
            expected_delivery: date(2025, 6, 20),
            order_date: date(2025, 6, 1),
            description: "Network infrastructure components".to_string(),
            line_items: vec![LineItem {
                product: "Network Switches".to_string(),
                quantity: 10,
                unit_price: dec!(2500.00),
            }],
        },
        PurchaseOrder {
            id: "PO-2025-102".to_string(),
            supplier: "Office Supplies Ltd".to_string(),
            amount: dec!(1500.00),
            status: PurchaseOrderStatus::Pending,
            expected_delivery: date(2025, 6, 15),
            order_date: date(2025, 6, 5),
            description: "Office supplies Q2".to_string(),
            line_items: vec![LineItem {
                product: "Office Supplies".to_string(),
                quantity: 1,
                unit_price: dec!(1500.00),
            }],
        },
    ]
}

pub fn templates() -> Vec<EmailTemplate> {
    vec![
        EmailTemplate {
            name: "payment_mismatch".to_string(),
            subject: "Payment Processing Alert - Transaction Mismatch".to_string(),
            body: "Dear Finance Team,\n\n\
A payment transaction requires your attention:\n\n\
Transaction Details:\n\
- Transaction ID: {transaction_id}\n\
- Account Number: {account_number}\n\
- Amount: ${amount}\n\
- Date: {transaction_date}\n\
- Reference: {reference}\n\n\
Issue: {issue_description}\n\n\
Customer Information:\n\
- Customer: {customer_name}\n\
- Email: {customer_email}\n\
- Account Status: {customer_status}\n\n\
Outstanding Invoices:\n\
{outstanding_invoices}\n\n\
Action Required: {action_required}\n\n\
Please review and take appropriate action.\n\n\
Best regards,\n\
Automated Payment Processing System"
                .to_string(),
        },
        EmailTemplate {
            name: "overpayment_alert".to_string(),
            subject: "Overpayment Alert - Customer {customer_name}".to_string(),
            body: "Dear Customer Service Team,\n\n\
We have received an overpayment that requires processing:\n\n\
Payment Details:\n\
- Customer: {customer_name}\n\
- Account: {account_number}\n\
- Payment Amount: ${payment_amount}\n\
- Outstanding Balance: ${outstanding_amount}\n\
- Overpayment: ${overpayment_amount}\n\n\
This overpayment needs to be processed according to company policy.\n\
Options: Refund, Credit to account, or Apply to future invoices.\n\n\
Customer Contact: {customer_email}\n\n\
Please contact the customer to confirm their preference.\n\n\
Best regards,\n\
Payment Processing System"
                .to_string(),
        },
        EmailTemplate {
            name: "unknown_customer".to_string(),
            subject: "Unknown Customer Payment - Investigation Required".to_string(),
            body: "Dear Finance Team,\n\n\
We received a payment from an unknown customer account:\n\n\
Payment Details:\n\
- Transaction ID: {transaction_id}\n\
- Account Number: {account_number}\n\
- Amount: ${amount}\n\
- Date: {transaction_date}\n\
- Description: {description}\n\n\
No matching customer found in the directory.\n\n\
Action Required:\n\
1. Research customer identity\n\
2. Determine if this is a new customer\n\
3. Process payment appropriately or return if necessary\n\n\
Holding payment pending investigation.\n\n\
Best regards,\n\
Payment Processing System"
                .to_string(),
        },
        EmailTemplate {
            name: "high_value_alert".to_string(),
            subject: "High Value Transaction Alert - ${amount}".to_string(),
            body: "Dear Management Team,\n\n\
A high-value transaction has been processed:\n\n\
Transaction Details:\n\
- Customer: {customer_name}\n\
- Account: {account_number}\n\
- Amount: ${amount}\n\
- Type: {transaction_type}\n\
- Date: {transaction_date}\n\n\
Customer Status: {customer_status}\n\
Previous Balance: ${previous_balance}\n\
New Balance: ${new_balance}\n\n\
This transaction exceeds the ${threshold} threshold and has been flagged for review.\n\n\
Please verify this transaction is legitimate.\n\n\
Best regards,\n\
Payment Monitoring System"
                .to_string(),
        },
        EmailTemplate {
            name: "suspended_customer_payment".to_string(),
            subject: "Payment from Suspended Customer - {customer_name}".to_string(),
            body: "Dear Customer Service Team,\n\n\
We received a payment from a suspended customer account:\n\n\
Customer: {customer_name}\n\
Account: {account_number}\n\
Amount: ${amount}\n\
Suspension Reason: Account review required\n\n\
The payment has been held pending account review.\n\n\
Action Required:\n\
1. Review customer account status\n\
2. Determine if suspension should be lifted\n\
3. Process or return payment accordingly\n\n\
Customer Contact: {customer_email}\n\n\
Best regards,\n\
Payment Processing System"
                .to_string(),
        },
    ]
}
