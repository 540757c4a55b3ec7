// src/services/pricing.rs
//
// Matemática de preços e custos do sistema, concentrada num único
// módulo de funções puras. Tanto a prévia (custo de receita ainda não
// salva) quanto a persistência de pedidos passam por aqui — não existe
// uma segunda fórmula em SQL para divergir desta.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::models::sales::OrderStatus;

// Valores monetários saem com 2 casas; quantidades ficam como vieram.
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// --- Item de pedido (rascunho) ---

#[derive(Debug, Clone, Copy)]
pub struct DraftItemAmounts {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub unit_cost: Decimal,
    pub discount: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemTotals {
    pub subtotal: Decimal,
    pub total_price: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
}

// Totais de uma linha. Sem clamping: desconto maior que o subtotal
// produz total negativo e isso é aceito aqui. O desconto é arredondado
// uma única vez e subtraído já redondo, para que a identidade
// total == subtotal - desconto feche centavo a centavo também na soma
// do pedido.
pub fn item_totals(item: &DraftItemAmounts) -> ItemTotals {
    let subtotal = round_money(item.quantity * item.unit_price);
    let discount = round_money(item.discount);
    let total_price = subtotal - discount;
    let total_cost = round_money(item.quantity * item.unit_cost);
    let profit = total_price - total_cost;

    ItemTotals {
        subtotal,
        total_price,
        total_cost,
        profit,
    }
}

// --- Resumo do pedido ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSummary {
    pub subtotal_amount: Decimal,
    pub total_discount: Decimal,
    pub total_amount: Decimal,
    pub total_cost: Decimal,
    pub profit: Decimal,
    pub debt: Decimal,
}

// Soma os totais de linha (via `item_totals`) e fecha a conta contra o
// pagamento proposto. Vale sempre:
//   total_amount == subtotal_amount - total_discount
// `debt` pode sair negativa em caso de pagamento a maior; quem exibe
// decide o que fazer com isso.
pub fn order_summary(items: &[DraftItemAmounts], payment_amount: Decimal) -> OrderSummary {
    let mut subtotal_amount = Decimal::ZERO;
    let mut total_discount = Decimal::ZERO;
    let mut total_amount = Decimal::ZERO;
    let mut total_cost = Decimal::ZERO;

    for item in items {
        let totals = item_totals(item);
        subtotal_amount += totals.subtotal;
        total_discount += round_money(item.discount);
        total_amount += totals.total_price;
        total_cost += totals.total_cost;
    }

    let profit = total_amount - total_cost;
    let debt = total_amount - payment_amount;

    OrderSummary {
        subtotal_amount,
        total_discount,
        total_amount,
        total_cost,
        profit,
        debt,
    }
}

// Campo de pagamento chega como texto livre do formulário. Vazio ou
// ilegível vale zero; vírgula decimal é aceita ("150,50"). Sai já em
// centavos redondos, como todo valor monetário persistido.
pub fn parse_payment_amount(raw: Option<&str>) -> Decimal {
    let Some(raw) = raw else {
        return Decimal::ZERO;
    };

    let normalized = raw.trim().replace(',', ".");
    if normalized.is_empty() {
        return Decimal::ZERO;
    }

    round_money(normalized.parse::<Decimal>().unwrap_or(Decimal::ZERO))
}

// --- Custo médio ponderado ---

// Σ(qtd × preço) / Σ(qtd) sobre o histórico de importações.
// Linhas com quantidade ou preço não positivos são descartadas
// (registros malformados não contaminam a média); sem linha válida o
// custo é zero.
pub fn weighted_average_cost<I>(imports: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut total_quantity = Decimal::ZERO;
    let mut total_value = Decimal::ZERO;

    for (quantity, unit_price) in imports {
        if quantity <= Decimal::ZERO || unit_price <= Decimal::ZERO {
            continue;
        }
        total_quantity += quantity;
        total_value += quantity * unit_price;
    }

    if total_quantity <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    round_money(total_value / total_quantity)
}

// Custo de UMA unidade do produto: para cada linha da receita,
// quantidade exigida × custo médio do material, somado. As linhas já
// saem arredondadas, então o total é exatamente a soma do que o
// usuário vê na tela.
pub fn product_unit_cost<I>(bom_lines: I) -> Decimal
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut total = Decimal::ZERO;
    for (quantity_required, material_avg_cost) in bom_lines {
        total += round_money(quantity_required * material_avg_cost);
    }
    total
}

// Quantas unidades inteiras do produto o estoque atual banca: o piso
// do mínimo de estoque/exigido entre as linhas da receita. Receita
// vazia (ou só linhas inválidas) produz zero.
pub fn possible_quantity<I>(bom_lines: I) -> i64
where
    I: IntoIterator<Item = (Decimal, Decimal)>,
{
    let mut min_units: Option<Decimal> = None;

    for (quantity_required, current_stock) in bom_lines {
        if quantity_required <= Decimal::ZERO {
            continue;
        }
        let units = current_stock / quantity_required;
        min_units = Some(match min_units {
            Some(current) if current <= units => current,
            _ => units,
        });
    }

    match min_units {
        Some(units) if units > Decimal::ZERO => units.floor().try_into().unwrap_or(0),
        _ => 0,
    }
}

// --- Status do pedido ---

// Derivado da dívida, nesta ordem: quitou (ou pagou a mais) fecha o
// pedido; pagou algo fica parcial; não pagou nada fica pendente.
pub fn derive_status(total_amount: Decimal, paid_amount: Decimal) -> OrderStatus {
    let debt = total_amount - paid_amount;

    if debt <= Decimal::ZERO {
        OrderStatus::Completed
    } else if paid_amount > Decimal::ZERO {
        OrderStatus::PartialPaid
    } else {
        OrderStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(quantity: Decimal, unit_price: Decimal, unit_cost: Decimal, discount: Decimal) -> DraftItemAmounts {
        DraftItemAmounts {
            quantity,
            unit_price,
            unit_cost,
            discount,
        }
    }

    // --- item_totals ---

    #[test]
    fn totais_de_linha_basicos() {
        let totals = item_totals(&item(dec!(4), dec!(120.00), dec!(34.80), dec!(20.00)));

        assert_eq!(totals.subtotal, dec!(480.00));
        assert_eq!(totals.total_price, dec!(460.00));
        assert_eq!(totals.total_cost, dec!(139.20));
        assert_eq!(totals.profit, dec!(320.80));
    }

    #[test]
    fn desconto_maior_que_subtotal_fica_negativo() {
        let totals = item_totals(&item(dec!(1), dec!(10.00), dec!(2.00), dec!(15.00)));

        assert_eq!(totals.total_price, dec!(-5.00));
        assert_eq!(totals.profit, dec!(-7.00));
    }

    #[test]
    fn quantidade_fracionada_arredonda_para_duas_casas() {
        // 2.5 m × 19.99 = 49.975 -> 49.98
        let totals = item_totals(&item(dec!(2.5), dec!(19.99), dec!(0), dec!(0)));
        assert_eq!(totals.subtotal, dec!(49.98));
    }

    // --- order_summary ---

    #[test]
    fn resumo_soma_linhas_e_fecha_com_desconto() {
        let items = [
            item(dec!(2), dec!(100.00), dec!(40.00), dec!(10.00)),
            item(dec!(1), dec!(50.00), dec!(20.00), dec!(0)),
        ];

        let summary = order_summary(&items, dec!(100.00));

        assert_eq!(summary.subtotal_amount, dec!(250.00));
        assert_eq!(summary.total_discount, dec!(10.00));
        assert_eq!(summary.total_amount, dec!(240.00));
        assert_eq!(summary.total_cost, dec!(100.00));
        assert_eq!(summary.profit, dec!(140.00));
        assert_eq!(summary.debt, dec!(140.00));

        // total == subtotal - desconto, sempre
        assert_eq!(
            summary.total_amount,
            summary.subtotal_amount - summary.total_discount
        );
    }

    #[test]
    fn resumo_de_pedido_vazio_zera_tudo() {
        let summary = order_summary(&[], Decimal::ZERO);

        assert_eq!(summary.total_amount, Decimal::ZERO);
        assert_eq!(summary.profit, Decimal::ZERO);
        assert_eq!(summary.debt, Decimal::ZERO);
    }

    #[test]
    fn pagamento_a_maior_deixa_divida_negativa() {
        let items = [item(dec!(1), dec!(100.00), dec!(0), dec!(0))];
        let summary = order_summary(&items, dec!(120.00));

        assert_eq!(summary.debt, dec!(-20.00));
    }

    #[test]
    fn identidade_do_desconto_sobrevive_a_arredondamento() {
        // Desconto com fração de centavo: arredonda uma vez só, e a
        // identidade continua fechando exata.
        let items = [
            item(dec!(3), dec!(33.33), dec!(0), dec!(0.005)),
            item(dec!(1), dec!(0.01), dec!(0), dec!(0.004)),
        ];

        let summary = order_summary(&items, Decimal::ZERO);
        assert_eq!(
            summary.total_amount,
            summary.subtotal_amount - summary.total_discount
        );
    }

    // --- parse_payment_amount ---

    #[test]
    fn pagamento_vazio_ou_ilegivel_vale_zero() {
        assert_eq!(parse_payment_amount(None), Decimal::ZERO);
        assert_eq!(parse_payment_amount(Some("")), Decimal::ZERO);
        assert_eq!(parse_payment_amount(Some("   ")), Decimal::ZERO);
        assert_eq!(parse_payment_amount(Some("abc")), Decimal::ZERO);
    }

    #[test]
    fn pagamento_aceita_ponto_e_virgula() {
        assert_eq!(parse_payment_amount(Some("150.50")), dec!(150.50));
        assert_eq!(parse_payment_amount(Some("150,50")), dec!(150.50));
        assert_eq!(parse_payment_amount(Some(" 80 ")), dec!(80));
    }

    // --- weighted_average_cost ---

    #[test]
    fn media_ponderada_do_historico() {
        // (10×100 + 20×200) / 30 = 166.666... -> 166.67
        let imports = vec![(dec!(10), dec!(100)), (dec!(20), dec!(200))];
        assert_eq!(weighted_average_cost(imports), dec!(166.67));
    }

    #[test]
    fn media_sem_importacao_valida_e_zero() {
        assert_eq!(weighted_average_cost(Vec::new()), Decimal::ZERO);

        // Linhas malformadas são descartadas
        let imports = vec![(dec!(0), dec!(100)), (dec!(10), dec!(0)), (dec!(-5), dec!(50))];
        assert_eq!(weighted_average_cost(imports), Decimal::ZERO);
    }

    #[test]
    fn media_ignora_linhas_malformadas_no_meio() {
        let imports = vec![(dec!(10), dec!(100)), (dec!(0), dec!(999)), (dec!(20), dec!(200))];
        assert_eq!(weighted_average_cost(imports), dec!(166.67));
    }

    #[test]
    fn media_e_idempotente_para_o_mesmo_historico() {
        let imports = [(dec!(3.5), dec!(12.40)), (dec!(7), dec!(11.90))];

        let first = weighted_average_cost(imports.to_vec());
        let second = weighted_average_cost(imports.to_vec());
        assert_eq!(first, second);
    }

    // --- product_unit_cost ---

    #[test]
    fn custo_do_produto_soma_as_linhas_da_receita() {
        // 2 × 166.67 + 0.5 × 80.00 = 333.34 + 40.00
        let bom = vec![(dec!(2), dec!(166.67)), (dec!(0.5), dec!(80.00))];
        assert_eq!(product_unit_cost(bom), dec!(373.34));
    }

    #[test]
    fn custo_de_receita_vazia_e_zero() {
        assert_eq!(product_unit_cost(Vec::new()), Decimal::ZERO);
    }

    // --- possible_quantity ---

    #[test]
    fn capacidade_e_o_piso_do_material_mais_restritivo() {
        // estoque 9 / exige 2 = 4.5 -> 4; estoque 50 / exige 1 = 50
        let bom = vec![(dec!(2), dec!(9)), (dec!(1), dec!(50))];
        assert_eq!(possible_quantity(bom), 4);
    }

    #[test]
    fn capacidade_zera_sem_receita_ou_sem_estoque() {
        assert_eq!(possible_quantity(Vec::new()), 0);
        assert_eq!(possible_quantity(vec![(dec!(2), dec!(0))]), 0);
        assert_eq!(possible_quantity(vec![(dec!(2), dec!(-4))]), 0);
    }

    #[test]
    fn capacidade_ignora_linha_com_exigencia_invalida() {
        let bom = vec![(dec!(0), dec!(100)), (dec!(3), dec!(10))];
        assert_eq!(possible_quantity(bom), 3);
    }

    // --- derive_status ---

    #[test]
    fn status_segue_a_divida() {
        assert_eq!(derive_status(dec!(100000), dec!(100000)), OrderStatus::Completed);
        assert_eq!(derive_status(dec!(100000), dec!(50000)), OrderStatus::PartialPaid);
        assert_eq!(derive_status(dec!(100000), dec!(0)), OrderStatus::Pending);

        // Pagamento a maior também fecha o pedido
        assert_eq!(derive_status(dec!(100000), dec!(120000)), OrderStatus::Completed);
    }

    #[test]
    fn pedido_de_valor_zero_nasce_concluido() {
        assert_eq!(derive_status(Decimal::ZERO, Decimal::ZERO), OrderStatus::Completed);
    }
}
