pub mod data {
    pub mod datasources {
        pub mod verify_receipt_datasource;
    }
    pub(crate) mod models {
        pub(crate) mod verify_receipt_request_model;
        pub(crate) mod verify_receipt_response_model;
    }
    pub mod repositories {
        pub mod purchase_repository_impl;
        pub mod receipt_repository_impl;
    }
}

pub mod domain {
    pub mod datasources {
        pub mod payment_queue_datasource;
        pub mod product_lookup_datasource;
        pub mod receipt_store_datasource;
    }
    pub mod entities {
        pub mod app_receipt;
        pub mod iap_product_id;
        pub mod iap_purchase_state;
        pub mod payment_transaction;
        pub mod verify_environment;
    }
    pub mod repositories {
        pub mod purchase_repository;
        pub mod receipt_repository;
    }
}

pub mod config;
pub(crate) mod constants;
pub mod errors;
pub mod manager;
