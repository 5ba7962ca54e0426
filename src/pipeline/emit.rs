use super::config::{options_value, GeneratorConfig};
use super::sink::ArtifactSink;
use crate::contract::{group_operations, parse_contract, ContractModel, DefinitionIndex, OperationEntry};
use crate::error::{GenError, Result};
use crate::render::{FsTemplates, HelperSet, TemplateRenderer, TemplateSource};
use minijinja::context;
use minijinja::value::Value;
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info};

/// One generated file: a relative output path and its rendered text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

/// A contract document queued for generation.
#[derive(Debug, Clone)]
pub struct ContractDocument {
    /// Identifier used in logs and errors, usually the file path
    pub name: String,
    pub text: String,
}

impl ContractDocument {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        ContractDocument {
            name: name.into(),
            text: text.into(),
        }
    }

    /// Read a contract file.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Parse`] wrapped in [`GenError::Document`] if the
    /// file cannot be read.
    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GenError::parse(format!("cannot read contract: {e}")).in_document(&name))?;
        Ok(ContractDocument { name, text })
    }
}

/// Join `target` and `file_name` into a relative, lexically normalized path.
///
/// `.` segments are dropped and `dir/..` pairs collapse, so `./definitions`
/// and `pet.js` give `definitions/pet.js`.
#[must_use]
pub fn artifact_path(target: &str, file_name: &str) -> PathBuf {
    let mut out = PathBuf::new();
    for component in Path::new(target).join(file_name).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if out.file_name().is_some() {
                    out.pop();
                } else {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// True when `path` is absolute or climbs above its starting directory.
#[must_use]
pub fn escapes_root(path: &Path) -> bool {
    matches!(
        path.components().next(),
        Some(Component::ParentDir | Component::RootDir | Component::Prefix(_))
    )
}

/// Post-processing strategy applied to every artifact before it is returned.
pub type PostProcessor = Box<dyn Fn(Artifact) -> Result<Artifact> + Send + Sync>;

/// The emission pipeline.
///
/// Owns the configuration, a template source and a renderer whose compiled
/// templates are reused across every document the generator processes.
/// Documents are processed one at a time; a failing document yields no
/// artifacts at all.
pub struct Generator {
    config: GeneratorConfig,
    sources: Box<dyn TemplateSource + Send + Sync>,
    renderer: TemplateRenderer,
    post_processor: Option<PostProcessor>,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("config", &self.config)
            .field("renderer", &self.renderer)
            .field("post_processor", &self.post_processor.is_some())
            .finish_non_exhaustive()
    }
}

impl Generator {
    pub fn new<S>(config: GeneratorConfig, sources: S, helpers: &HelperSet) -> Self
    where
        S: TemplateSource + Send + Sync + 'static,
    {
        Generator {
            config,
            sources: Box::new(sources),
            renderer: TemplateRenderer::new(helpers),
            post_processor: None,
        }
    }

    /// Build a generator from a configuration file. Template identifiers are
    /// resolved relative to the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`GenError::Config`] if the file cannot be loaded.
    pub fn from_config_file(path: &Path, helpers: &HelperSet) -> Result<Self> {
        let config = GeneratorConfig::from_path(path)?;
        let root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        Ok(Self::new(config, FsTemplates::new(root), helpers))
    }

    /// Install a post-processing strategy.
    #[must_use]
    pub fn with_post_processor<F>(mut self, post_processor: F) -> Self
    where
        F: Fn(Artifact) -> Result<Artifact> + Send + Sync + 'static,
    {
        self.post_processor = Some(Box::new(post_processor));
        self
    }

    #[must_use]
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Load and compile every configured template not compiled yet.
    fn prepare(&mut self) -> Result<()> {
        let ids: Vec<String> = self.config.templates().map(str::to_string).collect();
        for id in ids {
            if self.renderer.is_compiled(&id) {
                continue;
            }
            debug!(template = %id, "loading template");
            let source = self.sources.load(&id).map_err(|source| GenError::TemplateLoad {
                template: id.clone(),
                source,
            })?;
            self.renderer.compile(&id, source)?;
        }
        Ok(())
    }

    /// Generate the artifacts of one contract document.
    ///
    /// # Errors
    ///
    /// Any pipeline error, wrapped in [`GenError::Document`] naming `document`.
    pub fn generate(&mut self, document: &str, text: &str) -> Result<Vec<Artifact>> {
        info!(document, "processing contract");
        let result = parse_contract(text).and_then(|model| self.generate_model(&model));
        match result {
            Ok(artifacts) => {
                info!(document, artifacts = artifacts.len(), "finished contract");
                Ok(artifacts)
            }
            Err(e) => Err(e.in_document(document)),
        }
    }

    /// Generate the artifacts of an already parsed contract.
    ///
    /// # Errors
    ///
    /// Template load/compile/render errors and grouping errors.
    pub fn generate_model(&mut self, model: &ContractModel) -> Result<Vec<Artifact>> {
        self.prepare()?;
        let index = DefinitionIndex::build(model);
        debug!(definitions = index.len(), "built definition index");
        self.render(model, &index)
    }

    /// Render every configured rule against `model` and `index`.
    ///
    /// Artifacts come out per-definition rules first (rule order, then index
    /// order), then per-route rules (rule order, then group order).
    ///
    /// # Errors
    ///
    /// Template compile/render errors and grouping errors.
    pub fn render(&self, model: &ContractModel, index: &DefinitionIndex) -> Result<Vec<Artifact>> {
        let mut artifacts = Vec::new();
        if self.config.is_empty() {
            debug!("no perDefinition or perPath templates configured");
            return Ok(artifacts);
        }

        let model_value = Value::from_serialize(&model.document);
        let definition_map = Value::from_serialize(index.to_context());

        for (template_id, spec) in &self.config.per_definition {
            info!(template = %template_id, definitions = index.len(), "executing per-definition template");
            let template = self.renderer.template(template_id)?;
            let options = Value::from_serialize(options_value(spec)?);

            for definition in index.iter() {
                debug!(definition = %definition.reference_key, "rendering definition");
                let ctx = context! {
                    model => model_value.clone(),
                    definition => Value::from_serialize(&definition.body),
                    definitionMap => definition_map.clone(),
                    options => options.clone(),
                };
                let contents = template.render(ctx, &definition.reference_key)?;
                let file_name = format!("{}{}", definition.name.to_lowercase(), spec.extension);
                let path = artifact_path(&spec.target, &file_name);
                debug!(path = %path.display(), "emitting artifact");
                artifacts.push(self.finish(&definition.reference_key, Artifact { path, contents })?);
            }
        }

        for (template_id, spec) in &self.config.per_path {
            let template = self.renderer.template(template_id)?;
            let groups = group_operations(model, &spec.group_by, &spec.operations)?;
            info!(
                template = %template_id,
                group_by = %spec.group_by,
                groups = groups.len(),
                "executing per-path template"
            );
            let options = Value::from_serialize(options_value(spec)?);

            for group in groups.iter() {
                debug!(group = %group.key, members = group.members.len(), "rendering group");
                let file_name = group.key.trim().to_lowercase();
                let members: Vec<serde_json::Value> =
                    group.members.iter().map(OperationEntry::to_context).collect();
                let ctx = context! {
                    fileName => file_name.clone(),
                    groupKey => group.key.clone(),
                    members => Value::from_serialize(&members),
                    definitionMap => definition_map.clone(),
                    model => model_value.clone(),
                    options => options.clone(),
                };
                let contents = template.render(ctx, &group.key)?;
                let path = artifact_path(&spec.target, &format!("{file_name}{}", spec.extension));
                debug!(path = %path.display(), "emitting artifact");
                artifacts.push(self.finish(&group.key, Artifact { path, contents })?);
            }
        }

        Ok(artifacts)
    }

    /// Post-process `artifact` and check that it stays below the output root.
    fn finish(&self, item: &str, artifact: Artifact) -> Result<Artifact> {
        let artifact = match &self.post_processor {
            Some(post_processor) => post_processor(artifact)?,
            None => artifact,
        };
        if escapes_root(&artifact.path) {
            return Err(GenError::OutputPath {
                item: item.to_string(),
                path: artifact.path,
            });
        }
        Ok(artifact)
    }

    /// Process `documents` in order, handing each document's artifacts to
    /// `sink` once the document has fully rendered.
    ///
    /// Stops at the first failing document; documents before it have already
    /// been delivered to the sink.
    ///
    /// # Errors
    ///
    /// The first document or sink error, wrapped in [`GenError::Document`].
    pub fn generate_all<I>(&mut self, documents: I, sink: &mut dyn ArtifactSink) -> Result<usize>
    where
        I: IntoIterator<Item = ContractDocument>,
    {
        let mut total = 0;
        for document in documents {
            let artifacts = self.generate(&document.name, &document.text)?;
            total += artifacts.len();
            sink.accept(&document.name, artifacts)
                .map_err(|e| e.in_document(&document.name))?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{DefinitionSpec, MemorySink, RouteSpec};
    use crate::render::InlineTemplates;

    const PETS: &str = r#"
paths:
  /pets:
    x-swagger-router-controller: Pets
    get: {operationId: listPets}
    post: {operationId: addPet}
  /stores:
    get: {operationId: listStores, x-swagger-router-controller: Stores}
definitions:
  Pet: {type: object}
  Tag: {type: object}
"#;

    fn generator(config: GeneratorConfig, templates: InlineTemplates) -> Generator {
        Generator::new(config, templates, &HelperSet::builtin())
    }

    #[test]
    fn test_artifact_path_normalization() {
        assert_eq!(artifact_path("./definitions", "pet.js"), PathBuf::from("definitions/pet.js"));
        assert_eq!(artifact_path("", "pet.js"), PathBuf::from("pet.js"));
        assert_eq!(artifact_path("a/../b", "x.rs"), PathBuf::from("b/x.rs"));
        assert_eq!(artifact_path("../out", "x.rs"), PathBuf::from("../out/x.rs"));
    }

    #[test]
    fn test_escapes_root() {
        assert!(escapes_root(&artifact_path("definitions", "../../etc/evil.js")));
        assert!(escapes_root(Path::new("/etc/passwd")));
        assert!(!escapes_root(&artifact_path("definitions", "../models/pet.js")));
        assert!(!escapes_root(Path::new("definitions/pet.js")));
    }

    #[test]
    fn test_definition_name_cannot_escape_target() {
        let config = GeneratorConfig::new().per_definition("def.j2", DefinitionSpec::new("definitions", ".js"));
        let templates = InlineTemplates::new().with("def.j2", "x");
        let contract = "paths: {}\ndefinitions:\n  ../../../etc/Evil: {}\n";
        let err = generator(config, templates).generate("evil.yaml", contract).unwrap_err();
        match err.root() {
            GenError::OutputPath { item, path } => {
                assert_eq!(item, "#/definitions/../../../etc/Evil");
                assert_eq!(path, &PathBuf::from("../../etc/evil.js"));
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn test_group_key_cannot_escape_target() {
        let config = GeneratorConfig::new().per_path("ctl.j2", RouteSpec::new("controllers", ".js", "x-group"));
        let templates = InlineTemplates::new().with("ctl.j2", "x");
        let contract = "paths:\n  /a:\n    get: {x-group: ../../outside}\n";
        let err = generator(config, templates).generate("evil.yaml", contract).unwrap_err();
        assert!(matches!(err.root(), GenError::OutputPath { .. }));
    }

    #[test]
    fn test_empty_config_is_noop() {
        let mut generator = generator(GeneratorConfig::new(), InlineTemplates::new());
        assert!(generator.generate("pets.yaml", PETS).unwrap().is_empty());
    }

    #[test]
    fn test_definitions_then_groups() {
        let config = GeneratorConfig::new()
            .per_definition("def.j2", DefinitionSpec::new("./definitions", ".js"))
            .per_path(
                "ctl.j2",
                RouteSpec::new("controllers", ".js", "x-swagger-router-controller")
                    .with_operations(["get", "post"]),
            );
        let templates = InlineTemplates::new()
            .with("def.j2", "{{ definition.definitionName }}")
            .with("ctl.j2", "{{ groupKey }}:{% for m in members %}{{ m.operationId }},{% endfor %}");
        let artifacts = generator(config, templates).generate("pets.yaml", PETS).unwrap();

        let paths: Vec<_> = artifacts.iter().map(|a| a.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("definitions/pet.js"),
                PathBuf::from("definitions/tag.js"),
                PathBuf::from("controllers/pets.js"),
                PathBuf::from("controllers/stores.js"),
            ]
        );
        assert_eq!(artifacts[2].contents, "Pets:listPets,addPet,");
    }

    #[test]
    fn test_grouping_error_yields_no_artifacts() {
        let config = GeneratorConfig::new()
            .per_definition("def.j2", DefinitionSpec::new("defs", ".js"))
            .per_path("ctl.j2", RouteSpec::new("ctl", ".js", "x-missing"));
        let templates = InlineTemplates::new().with("def.j2", "x").with("ctl.j2", "y");
        let err = generator(config, templates).generate("pets.yaml", PETS).unwrap_err();
        assert!(matches!(err.root(), GenError::Grouping { .. }));
    }

    #[test]
    fn test_missing_template_is_load_error() {
        let config = GeneratorConfig::new().per_definition("nope.j2", DefinitionSpec::new("d", ".js"));
        let err = generator(config, InlineTemplates::new())
            .generate("pets.yaml", PETS)
            .unwrap_err();
        assert!(matches!(err.root(), GenError::TemplateLoad { .. }));
    }

    #[test]
    fn test_post_processor_applies() {
        let config = GeneratorConfig::new().per_definition("def.j2", DefinitionSpec::new("d", ".js"));
        let templates = InlineTemplates::new().with("def.j2", "body");
        let mut generator = generator(config, templates).with_post_processor(|mut a: Artifact| {
            a.contents.insert_str(0, "// generated\n");
            Ok(a)
        });
        let artifacts = generator.generate("pets.yaml", PETS).unwrap();
        assert!(artifacts.iter().all(|a| a.contents == "// generated\nbody"));
    }

    #[test]
    fn test_generate_all_stops_at_failing_document() {
        let config = GeneratorConfig::new().per_definition("def.j2", DefinitionSpec::new("d", ".js"));
        let templates = InlineTemplates::new().with("def.j2", "{{ definition.definitionName }}");
        let mut generator = generator(config, templates);
        let mut sink = MemorySink::default();
        let docs = vec![
            ContractDocument::new("good.yaml", PETS),
            ContractDocument::new("bad.yaml", "paths: [oops"),
            ContractDocument::new("never.yaml", PETS),
        ];
        let err = generator.generate_all(docs, &mut sink).unwrap_err();
        assert!(err.to_string().contains("bad.yaml"));
        assert_eq!(sink.artifacts().len(), 2);
    }
}
