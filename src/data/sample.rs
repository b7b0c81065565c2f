//! Built-in example table shown when no file has been opened.
//!
//! Row D has its coordinates entered the wrong way round and a broken
//! distance; row F has a broken travel time. Both exercise the cleaning pass.

use super::loader::{LoadError, SwapRule, load_bytes};
use super::model::CenterTable;

pub const EXAMPLE_CSV: &str = "\
Código,Nome,Enderezo,Concello,Provincia,Cód. postal,Teléfono,Tipo de centro,COORDENADA_X,COORDENADA_Y,TITULARIDADE,ENSINO_CONCERTADO,DEPENDENTE,Distancia_Santiago_km,Tiempo_Santiago_min
1,Centro A,Calle Falsa 1,Santiago,A Coruña,15701,981111111,Colegio,42.8782,-8.5448,Pública,No,Sí,0.5,2
2,Centro B,Avenida Real 2,Santiago,A Coruña,15702,981222222,Instituto,42.8790,-8.5500,Privada,Sí,No,1.2,5
3,Centro C,Plaza Mayor 3,A Coruña,A Coruña,15001,981333333,Colegio,43.3623,-8.4115,Pública,No,Sí,60.0,45
4,Centro D,Rua do Sol 4,Vigo,Pontevedra,36201,986444444,Guardería,-8.7226,42.2328,Privada,No,No,ERROR,70
5,Centro E,Calle Luna 5,Santiago,A Coruña,15703,981555555,Colegio,42.8750,-8.5400,Pública,Sí,Sí,0.8,3
6,Centro F,Rua Estrela 6,Pontevedra,Pontevedra,36001,986666666,Instituto,42.4336,-8.6477,Privada,Sí,No,70.0,ERROR
7,Centro G,Via Láctea 7,Lugo,Lugo,27001,982777777,Colegio,43.0128,-7.5566,Pública,No,Sí,100.0,80
8,Centro H,Paseo Marítimo 8,Ourense,Ourense,32001,988888888,Instituto,42.3364,-7.8640,Privada,Sí,No,120.0,95
9,Centro I,Ronda Exterior 9,Ferrol,A Coruña,15401,981999999,Guardería,43.4839,-8.2320,Pública,No,Sí,75.0,60
10,Centro J,Camiño Novo 10,Vigo,Pontevedra,36202,986000000,Colegio,42.2400,-8.7200,Privada,Sí,No,88.0,68
";

/// Clean the built-in example table with the given swap rule.
pub fn example_table(rule: SwapRule) -> Result<CenterTable, LoadError> {
    load_bytes(EXAMPLE_CSV.as_bytes(), rule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn example_table_cleans_to_eight_rows() {
        let table = example_table(SwapRule::SignPattern).unwrap();

        assert_eq!(table.report.original_rows, 10);
        assert_eq!(table.report.swapped, 1);
        assert_eq!(table.report.dropped, 2);

        let distances: Vec<f64> = table.records.iter().map(|r| r.distance_km).collect();
        assert_eq!(distances, [0.5, 1.2, 60.0, 0.8, 100.0, 120.0, 75.0, 88.0]);
    }

    #[test]
    fn swap_rule_only_changes_the_swap_count() {
        // Row D is dropped for its ERROR distance whichever rule runs.
        let sign = example_table(SwapRule::SignPattern).unwrap();
        let magnitude = example_table(SwapRule::Magnitude).unwrap();
        assert_eq!(sign.len(), magnitude.len());
        assert_eq!(magnitude.report.swapped, 0);
    }
}
