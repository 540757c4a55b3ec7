// src/common/i18n.rs

use std::collections::HashMap;
use std::sync::Arc;

// Catálogo de mensagens da API (pt/en), montado uma vez no AppState.
// Fallback: idioma desconhecido cai para "en"; chave desconhecida
// devolve a própria chave (melhor um texto feio que um 500).
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<&'static str, HashMap<&'static str, &'static str>>>,
}

impl I18nStore {
    pub fn new() -> Self {
        let mut pt: HashMap<&'static str, &'static str> = HashMap::new();
        pt.insert("validation.invalid_fields", "Um ou mais campos são inválidos.");
        pt.insert("crm.customer_not_found", "Cliente não encontrado.");
        pt.insert(
            "crm.customer_has_orders",
            "Cliente possui pedidos registrados e não pode ser removido.",
        );
        pt.insert("inventory.material_not_found", "Material não encontrado.");
        pt.insert(
            "inventory.material_name_taken",
            "Já existe um material chamado '{name}'.",
        );
        pt.insert(
            "inventory.material_in_use",
            "Material em uso por receitas ou importações e não pode ser removido.",
        );
        pt.insert(
            "inventory.insufficient_stock",
            "Estoque insuficiente de '{material}': necessário {required}, disponível {available}.",
        );
        pt.insert("catalog.product_not_found", "Produto não encontrado.");
        pt.insert(
            "catalog.duplicate_bom_material",
            "O material '{name}' aparece mais de uma vez na receita.",
        );
        pt.insert("sales.order_not_found", "Pedido não encontrado.");
        pt.insert("sales.empty_order", "O pedido precisa de pelo menos um item.");
        pt.insert("sales.invalid_order_item", "Item de pedido inválido: {detail}.");
        pt.insert(
            "sales.invalid_payment_amount",
            "O valor do pagamento deve ser maior que zero.",
        );
        pt.insert("common.internal_error", "Ocorreu um erro inesperado.");

        let mut en: HashMap<&'static str, &'static str> = HashMap::new();
        en.insert("validation.invalid_fields", "One or more fields are invalid.");
        en.insert("crm.customer_not_found", "Customer not found.");
        en.insert(
            "crm.customer_has_orders",
            "Customer has registered orders and cannot be removed.",
        );
        en.insert("inventory.material_not_found", "Material not found.");
        en.insert(
            "inventory.material_name_taken",
            "A material named '{name}' already exists.",
        );
        en.insert(
            "inventory.material_in_use",
            "Material is referenced by recipes or imports and cannot be removed.",
        );
        en.insert(
            "inventory.insufficient_stock",
            "Insufficient stock of '{material}': required {required}, available {available}.",
        );
        en.insert("catalog.product_not_found", "Product not found.");
        en.insert(
            "catalog.duplicate_bom_material",
            "Material '{name}' appears more than once in the recipe.",
        );
        en.insert("sales.order_not_found", "Order not found.");
        en.insert("sales.empty_order", "The order needs at least one item.");
        en.insert("sales.invalid_order_item", "Invalid order item: {detail}.");
        en.insert(
            "sales.invalid_payment_amount",
            "Payment amount must be greater than zero.",
        );
        en.insert("common.internal_error", "An unexpected error occurred.");

        let mut messages = HashMap::new();
        messages.insert("pt", pt);
        messages.insert("en", en);

        Self {
            messages: Arc::new(messages),
        }
    }

    pub fn get(&self, lang: &str, key: &'static str) -> &str {
        self.messages
            .get(lang)
            .or_else(|| self.messages.get("en"))
            .and_then(|catalog| catalog.get(key))
            .copied()
            .unwrap_or(key)
    }

    // Substitui os placeholders `{nome}` do template pelos parâmetros.
    pub fn render(&self, lang: &str, key: &'static str, params: &[(&str, String)]) -> String {
        let mut message = self.get(lang, key).to_string();
        for (name, value) in params {
            message = message.replace(&format!("{{{}}}", name), value);
        }
        message
    }
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idioma_desconhecido_cai_para_ingles() {
        let store = I18nStore::new();
        assert_eq!(store.get("fr", "crm.customer_not_found"), "Customer not found.");
    }

    #[test]
    fn chave_desconhecida_devolve_a_chave() {
        let store = I18nStore::new();
        assert_eq!(store.get("pt", "nao.existe"), "nao.existe");
    }

    #[test]
    fn render_substitui_placeholders() {
        let store = I18nStore::new();
        let msg = store.render(
            "pt",
            "inventory.insufficient_stock",
            &[
                ("material", "Tecido".to_string()),
                ("required", "5".to_string()),
                ("available", "2".to_string()),
            ],
        );
        assert_eq!(
            msg,
            "Estoque insuficiente de 'Tecido': necessário 5, disponível 2."
        );
    }
}
