//! Google Cloud client initialisation for Secret Manager and Cloud KMS.
//!
//! Both clients resolve credentials through Application Default Credentials
//! (the `GOOGLE_APPLICATION_CREDENTIALS` file, the gcloud user login, or the
//! metadata server of the workload).

pub mod clients;

pub use clients::{GcpKms, GcpSecretManager};
