mod common;

use common::{bundled_config, find, fixture, fixture_path};
use swagger_stencil::pipeline::{ContractDocument, FsSink, Generator};
use swagger_stencil::render::HelperSet;

fn render_petstore() -> Vec<swagger_stencil::Artifact> {
    let mut generator = Generator::from_config_file(&bundled_config(), &HelperSet::builtin()).unwrap();
    generator
        .generate("petstore.yaml", &fixture("petstore.yaml"))
        .unwrap()
}

#[test]
fn test_bundled_config_loads() {
    let generator = Generator::from_config_file(&bundled_config(), &HelperSet::builtin()).unwrap();
    let templates: Vec<_> = generator.config().templates().collect();
    assert_eq!(templates, vec!["./definition.js.j2", "./controller.js.j2"]);
}

#[test]
fn test_definition_class_output() {
    let artifacts = render_petstore();
    let pet = &find(&artifacts, "definitions/pet.js").contents;
    assert!(pet.starts_with("'use strict';"));
    assert!(pet.contains("const Category = require('./category');"));
    assert!(pet.contains("class Pet {"));
    assert!(pet.contains("this._category = new Category(input.category);"));
    assert!(pet.contains("this._status = input.status;"));
    assert!(pet.contains("throw new Error('Cannot initialize Pet - name cannot be null');"));
    assert!(pet.contains("pet status in the store"));
    assert!(pet.contains("result.photoUrls = this._photoUrls;"));
    assert!(pet.contains("module.exports = Pet;"));

    let order = &find(&artifacts, "definitions/order.js").contents;
    assert!(order.contains("class Order {"));
    assert!(!order.contains("require("));
    assert!(!order.contains("Cannot initialize"));
}

#[test]
fn test_controller_output() {
    let artifacts = render_petstore();
    let pets = &find(&artifacts, "controllers/pets.js").contents;
    assert!(pets.contains("const petsImplementation = require('../implementation/pets');"));
    assert!(pets.contains("function findPets(req, res) {"));
    assert!(pets.contains("Operation handler for addPet (POST /pets)"));
    assert!(pets.contains("const TypeDefinition = require('../definitions/pet');"));
    assert!(pets.contains("const body = new TypeDefinition(req.swagger.params.body.value);"));
    assert!(pets.contains("const status = req.swagger.params['status'].value;"));
    assert!(pets.contains("impl.deletePet(petId, res);"));
    assert!(!pets.contains("patchPet"));

    let stores = &find(&artifacts, "controllers/stores.js").contents;
    assert!(stores.contains("const TypeDefinition = require('../definitions/order');"));
    assert!(stores.contains("  placeOrder,"));
}

#[test]
fn test_generate_all_writes_tree() {
    let out = tempfile::tempdir().unwrap();
    let mut generator = Generator::from_config_file(&bundled_config(), &HelperSet::builtin()).unwrap();
    let mut sink = FsSink::new(out.path());
    let document = ContractDocument::from_path(&fixture_path("petstore.yaml")).unwrap();

    let total = generator.generate_all([document], &mut sink).unwrap();

    assert_eq!(total, 5);
    assert!(out.path().join("definitions/category.js").exists());
    assert!(out.path().join("controllers/stores.js").exists());
    assert_eq!(sink.report().written.len(), 5);
}
