mod document_test;
mod persistence_test;
