pub mod p900_manifest_facts;
