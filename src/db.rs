pub mod user_repo;
pub use user_repo::UserRepository;
pub mod specialist_repo;
pub use specialist_repo::SpecialistRepository;
pub mod secretary_repo;
pub use secretary_repo::SecretaryRepository;
pub mod company_repo;
pub use company_repo::CompanyRepository;
pub mod media_repo;
pub use media_repo::MediaRepository;
pub mod catalog_repo;
pub use catalog_repo::CatalogRepository;
pub mod fee_repo;
pub use fee_repo::FeeRepository;
