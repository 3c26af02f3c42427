//! Template engine based on MiniJinja

use deploygen_core::RenderContext;
use minijinja::Environment;
use serde::Deserialize;

use crate::error::{Result, TemplateError};
use crate::filters;
use crate::template::LoadedTemplate;

/// The template engine
///
/// Undefined variables are errors and the rendered output must parse as YAML.
#[derive(Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }

    /// Create a configured MiniJinja environment
    fn create_environment(&self) -> Environment<'static> {
        let mut env = Environment::new();
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);

        // Block tags on their own line leave no blank lines behind
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);

        env.add_filter("b64encode", filters::b64encode);
        env.add_filter("quote", filters::quote);

        env
    }

    /// Render a loaded template
    pub fn render(&self, template: &LoadedTemplate, context: &RenderContext) -> Result<String> {
        self.render_string(&template.source, context, &template.name)
    }

    /// Render a single template string
    pub fn render_string(
        &self,
        template: &str,
        context: &RenderContext,
        template_name: &str,
    ) -> Result<String> {
        let ctx = context.to_value()?;

        let mut env = self.create_environment();
        env.add_template_owned(template_name.to_string(), template.to_string())
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, Some(&ctx)))?;

        let tmpl = env
            .get_template(template_name)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, Some(&ctx)))?;

        let rendered = tmpl
            .render(&ctx)
            .map_err(|e| TemplateError::from_minijinja(e, template_name, template, Some(&ctx)))?;

        validate_yaml(template_name, &rendered)?;

        tracing::debug!(
            template = template_name,
            bytes = rendered.len(),
            certificates = context.certs.len(),
            "rendered template"
        );

        Ok(rendered)
    }
}

/// Check that every document in the rendered stream is well-formed YAML
fn validate_yaml(template_name: &str, rendered: &str) -> Result<()> {
    for document in serde_yaml::Deserializer::from_str(rendered) {
        serde_yaml::Value::deserialize(document)
            .map_err(|e| TemplateError::from_yaml(&e, template_name, rendered))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{EngineError, TemplateErrorKind};
    use crate::template::TemplateSource;
    use deploygen_core::{CertificateMap, CloudProvider, RawOptions};

    fn certs() -> CertificateMap {
        let mut certs = CertificateMap::new();
        certs.insert("caCrt".to_string(), "Y2EtY2VydA==".to_string());
        certs.insert("tlsKey".to_string(), "dGxzLWtleQ==".to_string());
        certs
    }

    fn context(internal: bool, csp: CloudProvider) -> RenderContext {
        let options = RawOptions {
            customer: !internal,
            internal,
            csp,
            ..Default::default()
        }
        .resolve()
        .unwrap();
        RenderContext::new(&options, certs())
    }

    fn render_builtin(ctx: &RenderContext) -> String {
        let template = TemplateSource::Builtin.load().unwrap();
        Engine::new().render(&template, ctx).unwrap()
    }

    fn documents(rendered: &str) -> Vec<serde_yaml::Value> {
        serde_yaml::Deserializer::from_str(rendered)
            .map(|doc| serde_yaml::Value::deserialize(doc).unwrap())
            .collect()
    }

    fn find<'a>(docs: &'a [serde_yaml::Value], kind: &str, name: &str) -> &'a serde_yaml::Value {
        docs.iter()
            .find(|d| d["kind"] == kind && d["metadata"]["name"] == name)
            .unwrap_or_else(|| panic!("no {} named {}", kind, name))
    }

    #[test]
    fn test_render_simple() {
        let engine = Engine::new();
        let ctx = context(false, CloudProvider::Aws);

        let template = "replicas: {{ configDbReplicas }}\ncsp: {{ cspType }}";
        let result = engine.render_string(template, &ctx, "test.yaml").unwrap();

        insta::assert_snapshot!(result, @r"
        replicas: 3
        csp: AWS
        ");
    }

    #[test]
    fn test_render_certificate_variables() {
        let engine = Engine::new();
        let ctx = context(true, CloudProvider::Gcp);

        let template = "ca: {{ caCrt }}\n{% for name, data in certs|dictsort %}\n{{ name }}: {{ data }}\n{% endfor %}";
        let result = engine.render_string(template, &ctx, "test.yaml").unwrap();

        assert_eq!(
            result,
            "ca: Y2EtY2VydA==\ncaCrt: Y2EtY2VydA==\ntlsKey: dGxzLWtleQ==\n"
        );
    }

    #[test]
    fn test_render_filters() {
        let engine = Engine::new();
        let ctx = context(false, CloudProvider::Aws);

        let result = engine
            .render_string("tag: {{ imageTag | quote }}", &ctx, "test.yaml")
            .unwrap();
        assert_eq!(result, "tag: \"v1\"");

        let result = engine
            .render_string("data: {{ cspType | b64encode }}", &ctx, "test.yaml")
            .unwrap();
        assert_eq!(result, "data: QVdT");
    }

    #[test]
    fn test_undefined_error() {
        let engine = Engine::new();
        let ctx = context(false, CloudProvider::Aws);

        let result = engine.render_string("value: {{ caCert }}", &ctx, "test.yaml");

        match result {
            Err(EngineError::Template(e)) => {
                assert_eq!(e.kind(), TemplateErrorKind::UndefinedVariable)
            }
            other => panic!("expected undefined variable error, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error() {
        let engine = Engine::new();
        let ctx = context(false, CloudProvider::Aws);

        let result = engine.render_string("{% if internal %}oops", &ctx, "test.yaml");

        match result {
            Err(EngineError::Template(e)) => assert_eq!(e.kind(), TemplateErrorKind::SyntaxError),
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_yaml_output() {
        let engine = Engine::new();
        let ctx = context(false, CloudProvider::Aws);

        let result = engine.render_string("key: [unclosed {{ cspType }}", &ctx, "test.yaml");

        match result {
            Err(EngineError::Template(e)) => {
                assert_eq!(e.kind(), TemplateErrorKind::YamlParseError)
            }
            other => panic!("expected YAML error, got {:?}", other),
        }
    }

    #[test]
    fn test_builtin_customer_aws() {
        let ctx = context(false, CloudProvider::Aws);
        let rendered = render_builtin(&ctx);
        let docs = documents(&rendered);

        let tls = find(&docs, "Secret", "nuvoloso-tls");
        assert_eq!(tls["data"]["caCrt"], "Y2EtY2VydA==");
        assert_eq!(tls["data"]["tlsKey"], "dGxzLWtleQ==");

        let pull = find(&docs, "Secret", "customer-dockerhub-secret");
        assert_eq!(pull["type"], "kubernetes.io/dockerconfigjson");

        let configdb = find(&docs, "StatefulSet", "configdb");
        assert_eq!(configdb["spec"]["replicas"], 3);
        assert_eq!(
            configdb["spec"]["volumeClaimTemplates"][0]["spec"]["storageClassName"],
            "gp2"
        );

        let centrald = find(&docs, "Deployment", "centrald");
        let pod = &centrald["spec"]["template"]["spec"];
        assert_eq!(pod["imagePullSecrets"][0]["name"], "customer-dockerhub-secret");
        assert_eq!(pod["containers"][0]["image"], "nuvolosocom/nvcentrald:v1");
        assert!(!rendered.contains("--debug-permit-rei"));
    }

    #[test]
    fn test_builtin_keeps_certificates_with_yaml_indicator_names() {
        let dir = tempfile::TempDir::new().unwrap();
        for name in ["#root.crt", "*tls.key", "&anchor.pem", "my cert.crt", "ca.crt"] {
            std::fs::write(dir.path().join(name), name.as_bytes()).unwrap();
        }
        let certs = deploygen_core::load_certificates(dir.path()).unwrap();
        assert_eq!(certs.len(), 5);

        let options = RawOptions {
            customer: true,
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let ctx = RenderContext::new(&options, certs.clone());
        let docs = documents(&render_builtin(&ctx));

        let data = find(&docs, "Secret", "nuvoloso-tls")["data"]
            .as_mapping()
            .expect("secret data is a mapping");
        assert_eq!(data.len(), certs.len());
        for (key, encoded) in &certs {
            assert_eq!(data[key.as_str()], encoded.as_str(), "{}", key);
        }
        assert_eq!(data["#rootCrt"], certs["#rootCrt"].as_str());
        assert_eq!(data["my certCrt"], certs["my certCrt"].as_str());
    }

    #[test]
    fn test_builtin_internal_gcp() {
        let ctx = context(true, CloudProvider::Gcp);
        let rendered = render_builtin(&ctx);
        let docs = documents(&rendered);

        assert!(!rendered.contains("dockerconfigjson"));

        let configdb = find(&docs, "StatefulSet", "configdb");
        assert_eq!(configdb["spec"]["replicas"], 1);
        assert_eq!(
            configdb["spec"]["volumeClaimTemplates"][0]["spec"]["storageClassName"],
            "standard"
        );

        let centrald = find(&docs, "Deployment", "centrald");
        let pod = &centrald["spec"]["template"]["spec"];
        assert!(pod.get("imagePullSecrets").is_none());
        assert_eq!(pod["containers"][0]["image"], "gcr.io/nuvoloso/nvcentrald:v1");

        let service = find(&docs, "Service", "nuvo-https");
        assert_eq!(
            service["metadata"]["annotations"]["networking.gke.io/load-balancer-type"],
            "Internal"
        );
    }

    #[test]
    fn test_builtin_internal_azure_keeps_pull_secret() {
        let ctx = context(true, CloudProvider::Azure);
        let rendered = render_builtin(&ctx);
        let docs = documents(&rendered);

        let centrald = find(&docs, "Deployment", "centrald");
        let pod = &centrald["spec"]["template"]["spec"];
        assert_eq!(pod["imagePullSecrets"][0]["name"], "internal-repo-secret");
        assert_eq!(
            pod["containers"][0]["image"],
            "nuvoloso.azurecr.io/nvcentrald:v1"
        );
    }

    #[test]
    fn test_builtin_error_injection() {
        let options = RawOptions {
            internal: true,
            enable_rei: true,
            ..Default::default()
        }
        .resolve()
        .unwrap();
        let ctx = RenderContext::new(&options, certs());

        let rendered = render_builtin(&ctx);
        assert!(rendered.contains("- --debug-permit-rei"));
    }

    #[test]
    fn test_builtin_has_no_blank_lines() {
        let rendered = render_builtin(&context(false, CloudProvider::Azure));
        assert!(!rendered.starts_with('\n'));
        assert!(!rendered.ends_with('\n'));
        assert!(!rendered.contains("\n\n"));
    }
}
