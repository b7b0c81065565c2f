//! Instruction prompt sent to the language model for filter extraction.

use std::sync::OnceLock;

use minijinja::{Environment, context};

static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Jinja template; `query` is the only variable.
const FILTER_PROMPT: &str = r#"Eres un asistente experto en analizar peticiones sobre filtros de datos. Tu tarea es extraer de la siguiente consulta el valor numérico y la unidad de medida (kilómetros o minutos) para filtrar un conjunto de datos.
Tu respuesta DEBE ser ÚNICAMENTE un objeto JSON que contenga las claves "valor" (un número entero) y "unidad" (un string que puede ser "km" o "minutos").
Si la consulta no contiene información de distancia o tiempo, devuelve un JSON vacío: {}.
NO DEBES incluir ningún otro texto, ni explicaciones, ni etiquetas de código, solo el objeto JSON.

Ejemplo de salida para: "Quiero ver los centros a 50 km de Santiago." -> {"valor": 50, "unidad": "km"}
Ejemplo de salida para: "Quiero ver los centros a 100 kilometros." -> {"valor": 100, "unidad": "km"}
Ejemplo de salida para: "Muestra los centros a 40 minutos." -> {"valor": 40, "unidad": "minutos"}
Ejemplo de salida para: "Centros a 20 minutos de Santiago." -> {"valor": 20, "unidad": "minutos"}
Ejemplo de salida para: "Dime centros a 20 kilometros de Santiago." -> {"valor": 20, "unidad": "km"}
Ejemplo de salida para: "Simplemente quiero ver los centros." -> {}
Ejemplo de salida para: "Filtra por 100." -> {}

Consulta: "{{ query }}"
"#;

/// Render the extraction prompt for a user query.
pub fn render_filter_prompt(query: &str) -> Result<String, minijinja::Error> {
    let env = TEMPLATE_ENV.get_or_init(Environment::new);
    env.render_str(FILTER_PROMPT, context! { query => query })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_query_and_examples() {
        let prompt = render_filter_prompt("centros a 30 km").unwrap();
        assert!(prompt.trim_end().ends_with("Consulta: \"centros a 30 km\""));
        assert!(prompt.contains(r#"-> {"valor": 50, "unidad": "km"}"#));
        assert!(prompt.contains("devuelve un JSON vacío: {}."));
    }

    #[test]
    fn query_text_is_not_interpreted_as_template() {
        let prompt = render_filter_prompt("{{ 1 + 1 }} km").unwrap();
        assert!(prompt.contains("Consulta: \"{{ 1 + 1 }} km\""));
    }
}
