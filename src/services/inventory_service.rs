// src/services/inventory_service.rs

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::{
        BulkImportReport, ImportHistoryEntry, Material, MaterialCost, MaterialImport,
        MaterialWithCost, SkippedBulkRow,
    },
    services::pricing,
};

// Linha de planilha já interpretada, pronta para virar importação.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedBulkRow {
    pub name: String,
    pub unit: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub notes: Option<String>,
}

#[derive(Clone)]
pub struct InventoryService {
    repo: InventoryRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(repo: InventoryRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    // =========================================================================
    //  MATERIAIS
    // =========================================================================

    pub async fn create_material(
        &self,
        name: &str,
        unit: &str,
        initial_stock: Option<Decimal>,
    ) -> Result<Material, AppError> {
        self.repo
            .create_material(&self.pool, name, unit, initial_stock)
            .await
    }

    // Listagem com custo médio: uma query para os materiais, uma para o
    // razão inteiro, média calculada aqui (a mesma função de custo da
    // submissão de pedidos).
    pub async fn list_materials(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<MaterialWithCost>, AppError> {
        let materials = self.repo.get_all_materials(search).await?;
        let lots = self.repo.get_all_import_lots().await?;

        let mut lots_by_material: HashMap<Uuid, Vec<(Decimal, Decimal)>> = HashMap::new();
        for (material_id, quantity, unit_price) in lots {
            lots_by_material
                .entry(material_id)
                .or_default()
                .push((quantity, unit_price));
        }

        let listing = materials
            .into_iter()
            .map(|m| {
                let average_cost = lots_by_material
                    .remove(&m.id)
                    .map(pricing::weighted_average_cost)
                    .unwrap_or(Decimal::ZERO);

                MaterialWithCost {
                    id: m.id,
                    name: m.name,
                    unit: m.unit,
                    current_stock: m.current_stock,
                    average_cost,
                    created_at: m.created_at,
                    updated_at: m.updated_at,
                }
            })
            .collect();

        Ok(listing)
    }

    pub async fn get_material(&self, id: Uuid) -> Result<Material, AppError> {
        self.repo
            .get_material_by_id(id)
            .await?
            .ok_or(AppError::MaterialNotFound)
    }

    pub async fn get_material_cost(&self, id: Uuid) -> Result<MaterialCost, AppError> {
        let material = self.get_material(id).await?;
        let imports = self.repo.get_imports_for_material(id).await?;

        let average_cost = pricing::weighted_average_cost(
            imports.iter().map(|i| (i.quantity, i.unit_price)),
        );

        Ok(MaterialCost {
            material_id: material.id,
            material_name: material.name,
            average_cost,
            current_stock: material.current_stock,
            imports_count: imports.len() as i64,
        })
    }

    // current_stock aqui é correção manual de inventário (contagem
    // física); entradas normais passam por record_import.
    pub async fn update_material(
        &self,
        id: Uuid,
        name: Option<&str>,
        unit: Option<&str>,
        current_stock: Option<Decimal>,
    ) -> Result<Material, AppError> {
        self.repo
            .update_material(&self.pool, id, name, unit, current_stock)
            .await?
            .ok_or(AppError::MaterialNotFound)
    }

    // Material com histórico de importação ou usado em alguma receita
    // não pode sair: apagaria a base do custo médio e quebraria BOMs.
    pub async fn delete_material(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let imports = self.repo.count_imports_for_material(&mut *tx, id).await?;
        let bom_refs = self.repo.count_bom_refs_for_material(&mut *tx, id).await?;
        if imports > 0 || bom_refs > 0 {
            return Err(AppError::MaterialInUse);
        }

        let deleted = self.repo.delete_material(&mut *tx, id).await?;
        if deleted == 0 {
            return Err(AppError::MaterialNotFound);
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    //  IMPORTAÇÕES
    // =========================================================================

    // Registra a entrada E soma no saldo, na mesma transação: o razão e
    // o estoque nunca andam separados.
    pub async fn record_import(
        &self,
        material_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
        notes: Option<&str>,
        import_date: Option<DateTime<Utc>>,
    ) -> Result<MaterialImport, AppError> {
        let mut tx = self.pool.begin().await?;

        self.repo
            .increment_stock(&mut *tx, material_id, quantity)
            .await?
            .ok_or(AppError::MaterialNotFound)?;

        let import = self
            .repo
            .create_import(&mut *tx, material_id, quantity, unit_price, notes, import_date)
            .await?;

        tx.commit().await?;
        Ok(import)
    }

    pub async fn get_import_history(
        &self,
        material_id: Option<Uuid>,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Result<Vec<ImportHistoryEntry>, AppError> {
        self.repo.get_import_history(material_id, from, to).await
    }

    // =========================================================================
    //  IMPORTAÇÃO EM LOTE (planilha colada)
    // =========================================================================
    // Linha boa entra, linha ruim é pulada e reportada com o motivo.
    // As linhas boas entram todas numa transação só.

    pub async fn bulk_import(&self, text: &str) -> Result<BulkImportReport, AppError> {
        let mut skipped = Vec::new();
        let mut parsed: Vec<ParsedBulkRow> = Vec::new();

        for (idx, line) in text.lines().enumerate() {
            let line_number = idx + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            if idx == 0 && is_header_line(trimmed) {
                continue;
            }

            match parse_bulk_line(trimmed) {
                Ok(row) => parsed.push(row),
                Err(reason) => {
                    let name = trimmed
                        .split(['\t', ';'])
                        .next()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .map(str::to_string);
                    skipped.push(SkippedBulkRow {
                        line: line_number,
                        name,
                        reason,
                    });
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        let mut materials_created = 0usize;
        let mut rows_imported = 0usize;

        for row in parsed {
            // Nome bate exato (sensível a maiúsculas); não achou, cria.
            // A busca roda dentro da transação para que linhas repetidas
            // do mesmo lote reaproveitem o material recém-criado.
            let material = match self.repo.find_material_by_name(&mut *tx, &row.name).await? {
                Some(existing) => existing,
                None => {
                    materials_created += 1;
                    self.repo
                        .create_material(&mut *tx, &row.name, &row.unit, None)
                        .await?
                }
            };

            self.repo
                .increment_stock(&mut *tx, material.id, row.quantity)
                .await?
                .ok_or(AppError::MaterialNotFound)?;

            self.repo
                .create_import(
                    &mut *tx,
                    material.id,
                    row.quantity,
                    row.unit_price,
                    row.notes.as_deref(),
                    None,
                )
                .await?;

            rows_imported += 1;
        }

        tx.commit().await?;

        Ok(BulkImportReport {
            materials_created,
            rows_imported,
            skipped,
        })
    }
}

// Cabeçalho de planilha colado junto ("name;unit;quantity;...").
fn is_header_line(line: &str) -> bool {
    let lowered = line.to_lowercase();
    (lowered.contains("name") && lowered.contains("unit"))
        || (lowered.contains("nome") && lowered.contains("unidade"))
}

// Colunas esperadas: nome, unidade, quantidade, preço unitário e notas
// opcionais. Separador: TAB (colado do Excel/Sheets) ou ponto e
// vírgula. Números aceitam vírgula decimal.
pub fn parse_bulk_line(line: &str) -> Result<ParsedBulkRow, String> {
    let columns: Vec<&str> = if line.contains('\t') {
        line.split('\t').collect()
    } else {
        line.split(';').collect()
    };

    if columns.len() < 4 {
        return Err(format!(
            "Esperadas 4 colunas (nome;unidade;quantidade;preço), encontradas {}",
            columns.len()
        ));
    }

    let name = columns[0].trim();
    if name.is_empty() {
        return Err("Nome do material vazio".to_string());
    }

    let unit = columns[1].trim();
    if unit.is_empty() {
        return Err("Unidade vazia".to_string());
    }

    let quantity = parse_decimal_column(columns[2])
        .ok_or_else(|| format!("Quantidade ilegível: '{}'", columns[2].trim()))?;
    if quantity <= Decimal::ZERO {
        return Err(format!("Quantidade deve ser positiva, veio {quantity}"));
    }

    let unit_price = parse_decimal_column(columns[3])
        .ok_or_else(|| format!("Preço ilegível: '{}'", columns[3].trim()))?;
    if unit_price <= Decimal::ZERO {
        return Err(format!("Preço deve ser positivo, veio {unit_price}"));
    }

    let notes = columns
        .get(4)
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .map(|c| c.to_string());

    Ok(ParsedBulkRow {
        name: name.to_string(),
        unit: unit.to_string(),
        quantity,
        unit_price,
        notes,
    })
}

fn parse_decimal_column(raw: &str) -> Option<Decimal> {
    raw.trim().replace(',', ".").parse::<Decimal>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn linha_com_ponto_e_virgula_e_virgula_decimal() {
        let row = parse_bulk_line("Tecido tricoline;m;10;18,90").unwrap();

        assert_eq!(row.name, "Tecido tricoline");
        assert_eq!(row.unit, "m");
        assert_eq!(row.quantity, dec!(10));
        assert_eq!(row.unit_price, dec!(18.90));
        assert_eq!(row.notes, None);
    }

    #[test]
    fn linha_com_tab_e_notas() {
        let row = parse_bulk_line("Ziper 20cm\tun\t50\t1.25\tlote de abril").unwrap();

        assert_eq!(row.unit, "un");
        assert_eq!(row.unit_price, dec!(1.25));
        assert_eq!(row.notes.as_deref(), Some("lote de abril"));
    }

    #[test]
    fn linha_com_colunas_faltando_e_rejeitada() {
        let err = parse_bulk_line("Tecido;m;10").unwrap_err();
        assert!(err.contains("4 colunas"));
    }

    #[test]
    fn quantidade_invalida_e_rejeitada() {
        assert!(parse_bulk_line("Tecido;m;abc;10").is_err());
        assert!(parse_bulk_line("Tecido;m;0;10").is_err());
        assert!(parse_bulk_line("Tecido;m;-5;10").is_err());
    }

    #[test]
    fn preco_invalido_e_rejeitado() {
        assert!(parse_bulk_line("Tecido;m;10;gratis").is_err());
        assert!(parse_bulk_line("Tecido;m;10;0").is_err());
    }

    #[test]
    fn nome_ou_unidade_vazios_sao_rejeitados() {
        assert!(parse_bulk_line(";m;10;5").is_err());
        assert!(parse_bulk_line("Tecido;;10;5").is_err());
    }

    #[test]
    fn cabecalho_e_reconhecido() {
        assert!(is_header_line("name;unit;quantity;unit_price"));
        assert!(is_header_line("Nome\tUnidade\tQuantidade\tPreço"));
        assert!(!is_header_line("Tecido;m;10;18,90"));
    }
}
