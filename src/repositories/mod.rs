pub mod vacancy_repository;
